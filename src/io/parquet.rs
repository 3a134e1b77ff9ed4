//! Typed Parquet records via Serde + Arrow.
//!
//! The Arrow schema is inferred from `T` with `SchemaLike::from_type`, rows
//! are bridged through `serde_arrow`, and the actual encoding is done by
//! `parquet::arrow::ArrowWriter`. Parquet readers need random access (the
//! footer lives at the end of the file), which a decompressing stream cannot
//! provide, so [`read_parquet_records`] spools the stream to an anonymous
//! temporary file first.

use anyhow::{Context, Result};
use arrow::datatypes::FieldRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_arrow::schema::{SchemaLike, TracingOptions};
use serde_arrow::{from_record_batch, to_record_batch};
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Write a typed slice as a Parquet file to a stream.
///
/// Works for empty slices too: a zero-row batch is written, so the file
/// still carries the schema.
///
/// # Returns
/// The number of rows written (`data.len()`).
///
/// # Errors
/// Returns an error if schema inference, row conversion, or writing fails.
pub fn write_parquet_records<T, W>(writer: W, data: &[T]) -> Result<usize>
where
    T: Serialize + Deserialize<'static>,
    W: Write + Send,
{
    let fields: Vec<FieldRef> = Vec::<FieldRef>::from_type::<T>(TracingOptions::default())
        .context("infer Arrow schema from row type")?;
    let batch: RecordBatch =
        to_record_batch(&fields, &data).context("convert rows to RecordBatch")?;

    let props = WriterProperties::builder().build();
    let mut wtr = ArrowWriter::try_new(writer, batch.schema(), Some(props))
        .context("create ArrowWriter")?;
    wtr.write(&batch).context("write batch to parquet")?;
    wtr.close().context("close ArrowWriter")?;

    Ok(data.len())
}

/// Read a Parquet stream into a typed `Vec<T>`.
///
/// The stream is spooled to a temporary file so the reader can seek; the
/// spool file is unlinked automatically.
///
/// # Errors
/// Returns an error if spooling fails, the reader cannot be built, or batch
/// conversion to `T` fails.
pub fn read_parquet_records<T: DeserializeOwned>(mut reader: impl Read) -> Result<Vec<T>> {
    let mut spool = tempfile::tempfile().context("create spool file")?;
    io::copy(&mut reader, &mut spool).context("spool parquet stream")?;
    spool.seek(SeekFrom::Start(0))?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(spool)
        .context("open ParquetRecordBatchReader")?;
    let mut rdr = builder
        .with_batch_size(64 * 1024)
        .build()
        .context("build ParquetRecordBatchReader")?;

    let mut out: Vec<T> = Vec::new();
    while let Some(batch) = rdr.next().transpose().context("read next batch")? {
        let mut rows: Vec<T> =
            from_record_batch(&batch).context("deserialize RecordBatch rows")?;
        out.append(&mut rows);
    }
    Ok(out)
}
