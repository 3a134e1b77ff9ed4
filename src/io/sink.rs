//! Finalizable byte sinks.
//!
//! Writers in this crate are stacked: a compression encoder sits on top of a
//! fan-out writer, which sits on top of one file handle per destination.
//! Flushing alone is not enough to tear such a stack down correctly; encoders
//! must write their trailers and remote handles must commit their uploads.
//! [`FinishWrite`] makes that finalization step explicit, and because each
//! layer owns the next, calling [`finish`](FinishWrite::finish) on the top of
//! the stack tears the whole thing down in reverse stacking order.

use std::fs::File;
use std::io::{self, BufWriter, Write};

/// A byte sink with an explicit finalization step.
///
/// `finish` consumes the sink, flushes anything still buffered, writes any
/// trailer the layer needs (compression footers, object-store commits), and
/// then finishes the sink it wraps. After `finish` returns `Ok`, all bytes
/// are durable at every layer below.
pub trait FinishWrite: Write + Send {
    /// Finalize this sink and everything it wraps.
    ///
    /// # Errors
    /// Returns an error if flushing, trailer writing, or finishing an inner
    /// sink fails.
    fn finish(self: Box<Self>) -> io::Result<()>;
}

impl FinishWrite for File {
    fn finish(mut self: Box<Self>) -> io::Result<()> {
        self.flush()
    }
}

impl<W: FinishWrite> FinishWrite for BufWriter<W> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        let inner = self.into_inner().map_err(|e| e.into_error())?;
        Box::new(inner).finish()
    }
}
