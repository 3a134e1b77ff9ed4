//! Pluggable compression codecs selected by filename suffix.
//!
//! The write path stacks a compression encoder on top of whatever sink the
//! caller provides (usually a [`FanoutWriter`](crate::io::fanout::FanoutWriter)),
//! picking the codec whose extension matches the primary output path. The
//! read path does the same for decompression, with a magic-byte fallback for
//! files whose extension lies.
//!
//! ## Built-in codecs
//!
//! Enabled via feature flags:
//! - **Gzip** (`.gz`, `.gzip`) via `flate2` (feature `compression-gzip`)
//! - **Zstd** (`.zst`, `.zstd`) via `zstd` (feature `compression-zstd`)
//! - **Bzip2** (`.bz2`, `.bzip2`) via `bzip2` (feature `compression-bzip2`)
//! - **Xz** (`.xz`) via `xz2` (feature `compression-xz`)
//!
//! Custom codecs implement [`CompressionCodec`] and join detection through
//! [`register_codec`].
//!
//! ## Compression levels
//!
//! [`auto_detect_writer`] forwards an optional level to the codec. Each codec
//! validates its own range (gzip 0-9, bzip2 1-9, zstd 1-22, xz 0-9) and
//! rejects anything else with `InvalidInput`. A level passed for a path with
//! no compressing suffix is ignored.

use crate::io::sink::FinishWrite;
use anyhow::{Context, Result};
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Global codec registry for pluggable compression support.
static CODEC_REGISTRY: RwLock<Option<Vec<Arc<dyn CompressionCodec>>>> = RwLock::new(None);

/// Initialize the codec registry with built-in codecs.
fn init_registry() -> Vec<Arc<dyn CompressionCodec>> {
    vec![
        #[cfg(feature = "compression-gzip")]
        Arc::new(GzipCodec),
        #[cfg(feature = "compression-zstd")]
        Arc::new(ZstdCodec),
        #[cfg(feature = "compression-bzip2")]
        Arc::new(Bzip2Codec),
        #[cfg(feature = "compression-xz")]
        Arc::new(XzCodec),
    ]
}

/// Get or initialize the global codec registry.
fn get_registry() -> Vec<Arc<dyn CompressionCodec>> {
    let mut lock = CODEC_REGISTRY.write().expect("codec registry poisoned");
    if lock.is_none() {
        *lock = Some(init_registry());
    }
    lock.as_ref().expect("codec registry initialized").clone()
}

/// Register a custom compression codec globally.
///
/// Registered codecs participate in suffix and magic-byte detection alongside
/// the built-in ones.
pub fn register_codec(codec: Arc<dyn CompressionCodec>) {
    let mut lock = CODEC_REGISTRY.write().expect("codec registry poisoned");
    if lock.is_none() {
        *lock = Some(init_registry());
    }
    lock.as_mut().expect("codec registry initialized").push(codec);
}

/// Pluggable compression codec.
///
/// Codecs are detected via file extensions (fast path) or magic bytes
/// (read-side fallback). Implementations must be `Send + Sync` as they live
/// in a global registry shared across threads.
pub trait CompressionCodec: Send + Sync {
    /// Human-readable codec name (e.g. "gzip", "zstd").
    fn name(&self) -> &str;

    /// File extensions associated with this codec, lowercase with the
    /// leading dot (e.g. `&[".gz", ".gzip"]`).
    fn extensions(&self) -> &[&str];

    /// Optional magic byte signature for content-based detection.
    fn magic_bytes(&self) -> Option<&[u8]>;

    /// Wrap a reader with decompression.
    ///
    /// # Errors
    /// Returns an error if the decompressor cannot be constructed.
    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> io::Result<Box<dyn Read>>;

    /// Wrap a sink with compression at the given level (codec default when
    /// `None`).
    ///
    /// # Errors
    /// Returns `InvalidInput` for an out-of-range level, or any error from
    /// constructing the encoder.
    fn wrap_writer_dyn(
        &self,
        writer: Box<dyn FinishWrite>,
        level: Option<u32>,
    ) -> io::Result<Box<dyn FinishWrite>>;
}

/// Detect a compression codec from a file path extension.
///
/// Returns the first registered codec whose extensions match. Matching is
/// case-insensitive and works on stacked extensions (e.g. `.csv.gz`).
pub(crate) fn detect_from_extension(path: impl AsRef<Path>) -> Option<Arc<dyn CompressionCodec>> {
    let path_str = path.as_ref().to_string_lossy().to_lowercase();

    for codec in get_registry() {
        for ext in codec.extensions() {
            if path_str.ends_with(ext) {
                return Some(codec.clone());
            }
        }
    }
    None
}

/// Detect a compression codec from magic bytes at the start of a stream.
///
/// Peeks at the buffered reader without advancing it.
fn detect_from_magic<R: BufRead>(reader: &mut R) -> Option<Arc<dyn CompressionCodec>> {
    let buf = reader.fill_buf().ok()?;
    if buf.is_empty() {
        return None;
    }

    for codec in get_registry() {
        if let Some(magic) = codec.magic_bytes()
            && buf.len() >= magic.len()
            && buf.starts_with(magic)
        {
            return Some(codec.clone());
        }
    }
    None
}

/// Wrap a reader with decompression if the path or content calls for it.
///
/// Detection strategy:
/// 1. file path extension (fast path)
/// 2. magic bytes, when the extension is not recognized
/// 3. pass the reader through untouched
///
/// # Errors
/// Returns an error if a matched codec fails to construct its decompressor.
pub fn auto_detect_reader<R: Read + 'static>(
    reader: R,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn Read>> {
    if let Some(codec) = detect_from_extension(&path_hint) {
        return codec
            .wrap_reader_dyn(Box::new(reader))
            .with_context(|| format!("wrap reader with {} codec", codec.name()));
    }

    let mut buf_reader = BufReader::new(reader);
    if let Some(codec) = detect_from_magic(&mut buf_reader) {
        return codec
            .wrap_reader_dyn(Box::new(buf_reader))
            .with_context(|| format!("wrap reader with {} codec", codec.name()));
    }

    Ok(Box::new(buf_reader))
}

/// Wrap a sink with compression if the path suffix calls for it.
///
/// Detection is based solely on the file path extension; `level` is handed to
/// the matched codec. With no match the sink is returned unchanged and
/// `level` is ignored.
///
/// # Errors
/// Returns an error if a matched codec rejects the level or fails to
/// construct its encoder.
pub fn auto_detect_writer(
    writer: Box<dyn FinishWrite>,
    path_hint: impl AsRef<Path>,
    level: Option<u32>,
) -> Result<Box<dyn FinishWrite>> {
    if let Some(codec) = detect_from_extension(&path_hint) {
        return codec
            .wrap_writer_dyn(writer, level)
            .with_context(|| format!("wrap writer with {} codec", codec.name()));
    }
    Ok(writer)
}

/// Reject a compression level outside `[min, max]` for `codec`.
fn check_level(codec: &str, level: u32, min: u32, max: u32) -> io::Result<u32> {
    if (min..=max).contains(&level) {
        Ok(level)
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{codec} compression level {level} out of range {min}-{max}"),
        ))
    }
}

// ============================================================================
// Built-in Codec Implementations
// ============================================================================

#[cfg(feature = "compression-gzip")]
struct GzipCodec;

#[cfg(feature = "compression-gzip")]
impl FinishWrite for flate2::write::GzEncoder<Box<dyn FinishWrite>> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        (*self).finish()?.finish()
    }
}

#[cfg(feature = "compression-gzip")]
impl CompressionCodec for GzipCodec {
    fn name(&self) -> &str {
        "gzip"
    }

    fn extensions(&self) -> &[&str] {
        &[".gz", ".gzip"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(&[0x1f, 0x8b])
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> io::Result<Box<dyn Read>> {
        use flate2::read::GzDecoder;
        Ok(Box::new(GzDecoder::new(reader)))
    }

    fn wrap_writer_dyn(
        &self,
        writer: Box<dyn FinishWrite>,
        level: Option<u32>,
    ) -> io::Result<Box<dyn FinishWrite>> {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        let compression = match level {
            Some(l) => Compression::new(check_level("gzip", l, 0, 9)?),
            None => Compression::default(),
        };
        Ok(Box::new(GzEncoder::new(writer, compression)))
    }
}

#[cfg(feature = "compression-zstd")]
struct ZstdCodec;

#[cfg(feature = "compression-zstd")]
impl FinishWrite for zstd::stream::write::Encoder<'static, Box<dyn FinishWrite>> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        (*self).finish()?.finish()
    }
}

#[cfg(feature = "compression-zstd")]
impl CompressionCodec for ZstdCodec {
    fn name(&self) -> &str {
        "zstd"
    }

    fn extensions(&self) -> &[&str] {
        &[".zst", ".zstd"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(&[0x28, 0xb5, 0x2f, 0xfd])
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> io::Result<Box<dyn Read>> {
        zstd::stream::read::Decoder::new(reader).map(|d| Box::new(d) as Box<dyn Read>)
    }

    fn wrap_writer_dyn(
        &self,
        writer: Box<dyn FinishWrite>,
        level: Option<u32>,
    ) -> io::Result<Box<dyn FinishWrite>> {
        let level = match level {
            Some(l) => check_level("zstd", l, 1, 22)? as i32,
            None => 3,
        };
        zstd::stream::write::Encoder::new(writer, level)
            .map(|e| Box::new(e) as Box<dyn FinishWrite>)
    }
}

#[cfg(feature = "compression-bzip2")]
struct Bzip2Codec;

#[cfg(feature = "compression-bzip2")]
impl FinishWrite for bzip2::write::BzEncoder<Box<dyn FinishWrite>> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        (*self).finish()?.finish()
    }
}

#[cfg(feature = "compression-bzip2")]
impl CompressionCodec for Bzip2Codec {
    fn name(&self) -> &str {
        "bzip2"
    }

    fn extensions(&self) -> &[&str] {
        &[".bz2", ".bzip2"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(&[0x42, 0x5a])
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> io::Result<Box<dyn Read>> {
        use bzip2::read::BzDecoder;
        Ok(Box::new(BzDecoder::new(reader)))
    }

    fn wrap_writer_dyn(
        &self,
        writer: Box<dyn FinishWrite>,
        level: Option<u32>,
    ) -> io::Result<Box<dyn FinishWrite>> {
        use bzip2::Compression;
        use bzip2::write::BzEncoder;
        let compression = match level {
            Some(l) => Compression::new(check_level("bzip2", l, 1, 9)?),
            None => Compression::default(),
        };
        Ok(Box::new(BzEncoder::new(writer, compression)))
    }
}

#[cfg(feature = "compression-xz")]
struct XzCodec;

#[cfg(feature = "compression-xz")]
impl FinishWrite for xz2::write::XzEncoder<Box<dyn FinishWrite>> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        (*self).finish()?.finish()
    }
}

#[cfg(feature = "compression-xz")]
impl CompressionCodec for XzCodec {
    fn name(&self) -> &str {
        "xz"
    }

    fn extensions(&self) -> &[&str] {
        &[".xz"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(&[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00])
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> io::Result<Box<dyn Read>> {
        use xz2::read::XzDecoder;
        Ok(Box::new(XzDecoder::new(reader)))
    }

    fn wrap_writer_dyn(
        &self,
        writer: Box<dyn FinishWrite>,
        level: Option<u32>,
    ) -> io::Result<Box<dyn FinishWrite>> {
        use xz2::write::XzEncoder;
        let level = match level {
            Some(l) => check_level("xz", l, 0, 9)?,
            None => 6,
        };
        Ok(Box::new(XzEncoder::new(writer, level)))
    }
}
