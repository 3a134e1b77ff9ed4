//! Fan-out writer: mirror one byte stream to several open sinks in parallel.
//!
//! [`FanoutWriter`] owns a list of already-open sinks and a dedicated rayon
//! thread pool sized to the number of sinks. Every `write` submits one
//! mirror-write per sink and blocks until all of them complete, so a caller
//! that writes chunk K is guaranteed every destination has received chunk K
//! before chunk K+1 is submitted. That is the only ordering guarantee: there
//! is no retry, no timeout, and no isolation of a failing sink beyond
//! surfacing its error to the caller.

use crate::io::sink::FinishWrite;
use anyhow::{Context, Result, ensure};
use rayon::prelude::*;
use std::io::{self, Write};

/// Mirrors writes to multiple sinks using a bounded worker pool.
///
/// Sinks are written concurrently within a single `write` call, but calls
/// themselves are serialized by `&mut self`, so every sink observes the same
/// byte sequence in the same order.
pub struct FanoutWriter {
    sinks: Vec<Box<dyn FinishWrite>>,
    pool: rayon::ThreadPool,
}

impl FanoutWriter {
    /// Build a fan-out writer over a non-empty set of open sinks.
    ///
    /// The internal pool holds exactly one worker per sink.
    ///
    /// # Errors
    /// Returns an error if `sinks` is empty or the thread pool cannot be
    /// created.
    pub fn new(sinks: Vec<Box<dyn FinishWrite>>) -> Result<Self> {
        ensure!(!sinks.is_empty(), "fan-out writer needs at least one sink");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(sinks.len())
            .build()
            .context("build fan-out worker pool")?;
        Ok(Self { sinks, pool })
    }

    /// Number of destinations this writer mirrors to.
    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Write for FanoutWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Self { sinks, pool } = self;
        pool.install(|| sinks.par_iter_mut().try_for_each(|s| s.write_all(buf)))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let Self { sinks, pool } = self;
        pool.install(|| sinks.par_iter_mut().try_for_each(|s| s.flush()))
    }
}

impl FinishWrite for FanoutWriter {
    /// Finish every sink. All sinks are finished even when one of them
    /// fails; the first error observed is returned.
    fn finish(self: Box<Self>) -> io::Result<()> {
        let this = *self;
        let mut first_err: Option<io::Error> = None;
        for sink in this.sinks {
            if let Err(e) = sink.finish()
                && first_err.is_none()
            {
                first_err = Some(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
