//! Typed CSV records over arbitrary byte streams.
//!
//! Rows are Serde-backed (`DeserializeOwned`/`Serialize`); the stream the
//! records travel over is supplied by the caller, so the same code serves
//! plain files, decompressors, and the fan-out writer. On write, `chunk_size`
//! flushes the CSV writer every N rows so downstream sinks see the output in
//! bounded pieces.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{Read, Write};

/// Read CSV records from a stream into a typed `Vec<T>`.
///
/// If `has_headers` is `true`, the first row is treated as a header and not
/// deserialized into `T`. Errors are annotated with row numbers.
///
/// # Errors
/// Returns an error if any row fails to deserialize into `T`.
pub fn read_csv_records<T: DeserializeOwned>(reader: impl Read, has_headers: bool) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(has_headers)
        .from_reader(reader);
    let mut out = Vec::<T>::new();
    for (i, rec) in rdr.deserialize::<T>().enumerate() {
        let v = rec.with_context(|| format!("parse CSV record #{}", i + 1))?;
        out.push(v);
    }
    Ok(out)
}

/// Write a typed slice as CSV to a stream.
///
/// Emits a header row when `has_headers` is `true` (via `csv` conventions).
/// With `chunk_size = Some(n)`, the writer is flushed after every `n` rows.
///
/// # Returns
/// The number of rows written (`data.len()`).
///
/// # Errors
/// Returns an error if any row fails to serialize or flush.
pub fn write_csv_records<T: Serialize>(
    writer: impl Write,
    data: &[T],
    has_headers: bool,
    chunk_size: Option<usize>,
) -> Result<usize> {
    let mut wtr = WriterBuilder::new()
        .has_headers(has_headers)
        .from_writer(writer);
    let chunk = chunk_size.unwrap_or(0);
    for (i, row) in data.iter().enumerate() {
        wtr.serialize(row)
            .with_context(|| format!("serialize CSV row #{}", i + 1))?;
        if chunk > 0 && (i + 1) % chunk == 0 {
            wtr.flush()?;
        }
    }
    wtr.flush()?;
    Ok(data.len())
}
