//! The write helper: N destination handles, fan-out, compression, format writer.

use crate::io::compression::auto_detect_writer;
use crate::io::fanout::FanoutWriter;
use crate::io::sink::FinishWrite;
use crate::io::transport;
use crate::options::{DataFormat, WriteOptions, validate_encoding};
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::BufWriter;

/// Write a typed dataset to a primary path and any number of copy paths.
///
/// One write handle is opened per destination (each resolved through its own
/// transport), all handles are wrapped in a [`FanoutWriter`] that mirrors
/// every chunk to every destination in parallel, and a compression encoder
/// matching the **primary** path's suffix is stacked on top. The format
/// writer then streams into that stack; on completion the stack is finished
/// in reverse stacking order, so every destination holds identical, complete
/// bytes or the call returns an error.
///
/// For chunked text formats (`chunk_size`), CSV flushes every N rows and
/// JSON splits the dataset into parts written back to back.
///
/// # Examples
/// ```no_run
/// use df_io::{DataFormat, WriteOptions, write_df};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Row {
///     id: u32,
///     name: String,
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let rows = vec![Row { id: 1, name: "a".into() }];
/// let options = WriteOptions::default()
///     .with_copy_paths(["backup/rows.csv.zst"])
///     .with_compression_level(19);
/// write_df(&rows, "data/rows.csv.zst", DataFormat::Csv, &options)?;
/// # Ok(())
/// # }
/// ```
///
/// # Returns
/// The number of rows written (`data.len()`).
///
/// # Errors
/// Propagates errors from transports, the codec, the format writer, and
/// finalization. An unsupported `encoding` option fails with
/// [`EncodingError`](crate::EncodingError) before anything is opened.
pub fn write_df<T: Serialize + Deserialize<'static>>(
    data: &[T],
    path: &str,
    format: DataFormat,
    options: &WriteOptions,
) -> Result<usize> {
    validate_encoding(options.encoding.as_deref())?;

    let mut handles: Vec<Box<dyn FinishWrite>> = Vec::with_capacity(options.copy_paths.len() + 1);
    for p in options
        .copy_paths
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(path))
    {
        let transport = transport::resolve(p)?;
        handles.push(
            transport
                .open_writer(p)
                .with_context(|| format!("create {p}"))?,
        );
    }
    debug!(
        "writing {} rows as {format} to {path} (+{} copies)",
        data.len(),
        options.copy_paths.len()
    );

    let fanout = FanoutWriter::new(handles)?;
    let mut sink = auto_detect_writer(Box::new(fanout), path, options.compression_level)
        .with_context(|| format!("setup compression for {path}"))?;

    let rows = {
        // Buffer so the fan-out mirrors sizable chunks instead of every
        // serializer write.
        let mut buffered = BufWriter::new(&mut *sink);
        let rows = match format {
            #[cfg(feature = "io-csv")]
            DataFormat::Csv => crate::io::csv::write_csv_records(
                &mut buffered,
                data,
                options.has_headers,
                options.chunk_size,
            )
            .with_context(|| format!("write csv to {path}"))?,
            #[cfg(feature = "io-json")]
            DataFormat::Json => {
                crate::io::json::write_json_records(&mut buffered, data, options.chunk_size)
                    .with_context(|| format!("write json to {path}"))?
            }
            #[cfg(feature = "io-parquet")]
            DataFormat::Parquet => {
                crate::io::parquet::write_parquet_records(&mut buffered, data)
                    .with_context(|| format!("write parquet to {path}"))?
            }
            #[cfg(feature = "io-feather")]
            DataFormat::Feather => {
                crate::io::feather::write_feather_records(&mut buffered, data)
                    .with_context(|| format!("write feather to {path}"))?
            }
            #[allow(unreachable_patterns)]
            other => anyhow::bail!("support for the {other} format is not compiled in"),
        };
        std::io::Write::flush(&mut buffered)?;
        rows
    };

    sink.finish()
        .with_context(|| format!("finalize write to {path}"))?;
    Ok(rows)
}
