//! The read helper: transport, decompression, format reader.

use crate::io::compression::auto_detect_reader;
use crate::io::transport;
use crate::options::{DataFormat, ReadOptions, validate_encoding};
use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;

/// Read a dataset from a local or remote path into a typed `Vec<T>`.
///
/// The path prefix selects the transport (`scheme://`, local files without
/// one), the filename suffix selects the decompressor (with a magic-byte
/// fallback), and `format` selects the reader. Formats whose readers need to
/// seek (Parquet, Feather) are spooled through a temporary file.
///
/// # Examples
/// ```no_run
/// use df_io::{DataFormat, ReadOptions, read_df};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Row {
///     id: u32,
///     name: String,
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let rows: Vec<Row> = read_df("data/rows.csv.gz", DataFormat::Csv, &ReadOptions::default())?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Propagates errors from the transport, the codec, and the format reader,
/// annotated with the path. An unsupported `encoding` option fails with
/// [`EncodingError`](crate::EncodingError) before anything is opened.
pub fn read_df<T: DeserializeOwned>(
    path: &str,
    format: DataFormat,
    options: &ReadOptions,
) -> Result<Vec<T>> {
    validate_encoding(options.encoding.as_deref())?;

    let transport = transport::resolve(path)?;
    let raw = transport
        .open_reader(path)
        .with_context(|| format!("open {path}"))?;
    let stream = auto_detect_reader(raw, path)
        .with_context(|| format!("setup decompression for {path}"))?;
    debug!("reading {format} dataset from {path}");

    match format {
        #[cfg(feature = "io-csv")]
        DataFormat::Csv => crate::io::csv::read_csv_records(stream, options.has_headers)
            .with_context(|| format!("read csv from {path}")),
        #[cfg(feature = "io-json")]
        DataFormat::Json => crate::io::json::read_json_records(stream)
            .with_context(|| format!("read json from {path}")),
        #[cfg(feature = "io-parquet")]
        DataFormat::Parquet => crate::io::parquet::read_parquet_records(stream)
            .with_context(|| format!("read parquet from {path}")),
        #[cfg(feature = "io-feather")]
        DataFormat::Feather => crate::io::feather::read_feather_records(stream)
            .with_context(|| format!("read feather from {path}")),
        #[allow(unreachable_patterns)]
        other => anyhow::bail!("support for the {other} format is not compiled in"),
    }
}
