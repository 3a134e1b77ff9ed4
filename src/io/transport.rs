//! Pluggable transports: resolve a path string to open byte streams.
//!
//! The scheme prefix of a path decides which transport opens it:
//! `mem://bucket/key` goes to whatever transport is registered for `mem`,
//! `file:///tmp/x.csv` and plain `/tmp/x.csv` go to the local filesystem.
//! Transports are provider-agnostic and synchronous; a real object-storage
//! client (S3, GCS, ...) implements [`Transport`] and joins resolution through
//! [`register_transport`].
//!
//! [`MemoryTransport`] is an in-memory object store for tests and examples.
//! Its write handles buffer locally and commit the object atomically on
//! `finish`, the way object-store uploads complete on close.

use crate::io::sink::FinishWrite;
use anyhow::{Result, bail};
use std::collections::HashMap;
use std::fs::{File, create_dir_all};
use std::io::{self, BufWriter, Cursor, Read, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};

/// Global transport registry keyed by scheme.
static TRANSPORT_REGISTRY: RwLock<Option<Vec<Arc<dyn Transport>>>> = RwLock::new(None);

fn init_registry() -> Vec<Arc<dyn Transport>> {
    vec![Arc::new(LocalTransport)]
}

fn get_registry() -> Vec<Arc<dyn Transport>> {
    let mut lock = TRANSPORT_REGISTRY.write().expect("transport registry poisoned");
    if lock.is_none() {
        *lock = Some(init_registry());
    }
    lock.as_ref().expect("transport registry initialized").clone()
}

/// Register a transport globally.
///
/// Later [`resolve`] calls will route paths with a matching `scheme://`
/// prefix to it. The first registered transport for a scheme wins.
pub fn register_transport(transport: Arc<dyn Transport>) {
    let mut lock = TRANSPORT_REGISTRY.write().expect("transport registry poisoned");
    if lock.is_none() {
        *lock = Some(init_registry());
    }
    lock.as_mut()
        .expect("transport registry initialized")
        .push(transport);
}

/// A way of opening byte streams for a family of paths.
///
/// Implementations must be `Send + Sync`; they are shared from a global
/// registry and may be used from multiple threads.
pub trait Transport: Send + Sync {
    /// URI scheme this transport claims (without `://`), e.g. `"file"`.
    fn scheme(&self) -> &str;

    /// Open a raw (not decompressed) read stream for `path`.
    ///
    /// # Errors
    /// Returns an error if the path does not exist or cannot be opened.
    fn open_reader(&self, path: &str) -> io::Result<Box<dyn Read + Send>>;

    /// Open a raw write handle for `path`.
    ///
    /// The handle's [`FinishWrite::finish`] must make the written bytes
    /// visible at the destination.
    ///
    /// # Errors
    /// Returns an error if the destination cannot be created.
    fn open_writer(&self, path: &str) -> io::Result<Box<dyn FinishWrite>>;
}

/// Resolve the transport responsible for `path`.
///
/// Paths without a `scheme://` prefix use the local filesystem.
///
/// # Errors
/// Returns an error naming the scheme if no registered transport claims it.
pub fn resolve(path: &str) -> Result<Arc<dyn Transport>> {
    let Some((scheme, _)) = path.split_once("://") else {
        return Ok(Arc::new(LocalTransport));
    };
    for transport in get_registry() {
        if transport.scheme() == scheme {
            return Ok(transport);
        }
    }
    bail!("no transport registered for scheme {scheme}:// (path {path})");
}

// ============================================================================
// Local filesystem
// ============================================================================

/// Local filesystem transport; also registered for the `file` scheme.
pub struct LocalTransport;

impl LocalTransport {
    fn strip(path: &str) -> &Path {
        Path::new(path.strip_prefix("file://").unwrap_or(path))
    }
}

impl Transport for LocalTransport {
    fn scheme(&self) -> &str {
        "file"
    }

    fn open_reader(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        let f = File::open(Self::strip(path))?;
        Ok(Box::new(f))
    }

    fn open_writer(&self, path: &str) -> io::Result<Box<dyn FinishWrite>> {
        let path = Self::strip(path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent)?;
        }
        let f = File::create(path)?;
        Ok(Box::new(BufWriter::new(f)))
    }
}

// ============================================================================
// In-memory object store
// ============================================================================

type ObjectMap = Arc<Mutex<HashMap<String, Vec<u8>>>>;

/// In-memory object-store transport for tests.
///
/// Objects are keyed by the full path string. Clones share the same store,
/// so keep a clone around to inspect what was written:
///
/// ```
/// use df_io::{MemoryTransport, register_transport};
/// use std::sync::Arc;
///
/// let mem = MemoryTransport::new("mem");
/// register_transport(Arc::new(mem.clone()));
/// // ... write through `mem://...` paths, then:
/// assert_eq!(mem.object_count(), 0);
/// ```
#[derive(Clone)]
pub struct MemoryTransport {
    scheme: String,
    objects: ObjectMap,
}

impl MemoryTransport {
    /// Create an empty store claiming `scheme`.
    #[must_use]
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            objects: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Bytes of the object stored at `path`, if any.
    #[must_use]
    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("object store poisoned")
            .get(path)
            .cloned()
    }

    /// Number of committed objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.lock().expect("object store poisoned").len()
    }
}

impl Transport for MemoryTransport {
    fn scheme(&self) -> &str {
        &self.scheme
    }

    fn open_reader(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        match self.object(path) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no object at {path}"),
            )),
        }
    }

    fn open_writer(&self, path: &str) -> io::Result<Box<dyn FinishWrite>> {
        Ok(Box::new(MemoryObjectWriter {
            key: path.to_string(),
            buf: Vec::new(),
            objects: self.objects.clone(),
        }))
    }
}

/// Buffering write handle that commits its object on `finish`.
struct MemoryObjectWriter {
    key: String,
    buf: Vec<u8>,
    objects: ObjectMap,
}

impl Write for MemoryObjectWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FinishWrite for MemoryObjectWriter {
    fn finish(self: Box<Self>) -> io::Result<()> {
        let this = *self;
        this.objects
            .lock()
            .expect("object store poisoned")
            .insert(this.key, this.buf);
        Ok(())
    }
}
