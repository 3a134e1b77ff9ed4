//! Newline-delimited JSON records over arbitrary byte streams.
//!
//! One compact JSON value per line; empty and whitespace-only lines are
//! skipped on read. On write, `chunk_size` splits the dataset into parts
//! written back to back, each part ending on the newline separator and
//! flushed before the next part starts.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{BufRead, BufReader, Read, Write};

/// Read newline-delimited JSON records from a stream into a typed `Vec<T>`.
///
/// # Errors
/// Returns an error if a line cannot be read or fails to parse into `T`.
/// Errors carry the line number.
pub fn read_json_records<T: DeserializeOwned>(reader: impl Read) -> Result<Vec<T>> {
    let rdr = BufReader::new(reader);
    let mut out = Vec::<T>::new();
    for (i, line) in rdr.lines().enumerate() {
        let line = line.with_context(|| format!("read line {}", i + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let v: T = serde_json::from_str(&line)
            .with_context(|| format!("parse JSON line {}: {}", i + 1, line))?;
        out.push(v);
    }
    Ok(out)
}

/// Write a typed slice as newline-delimited JSON to a stream.
///
/// Every record is serialized to one line terminated by `\n`. With
/// `chunk_size = Some(n)`, the dataset is split into parts of at most `n`
/// records; each part is flushed once its trailing separator is written, so
/// parts concatenate into the same bytes an unchunked write produces.
///
/// # Returns
/// The number of records written (`data.len()`).
///
/// # Errors
/// Returns an error if any record fails to serialize or the stream fails.
pub fn write_json_records<T: Serialize>(
    mut writer: impl Write,
    data: &[T],
    chunk_size: Option<usize>,
) -> Result<usize> {
    let part_len = chunk_size.unwrap_or(data.len()).max(1);
    for (p, part) in data.chunks(part_len).enumerate() {
        for (i, item) in part.iter().enumerate() {
            serde_json::to_writer(&mut writer, item)
                .with_context(|| format!("serialize record #{}", p * part_len + i + 1))?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }
    Ok(data.len())
}
