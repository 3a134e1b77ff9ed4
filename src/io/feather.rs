//! Typed Feather (Arrow IPC file) records via Serde + Arrow.
//!
//! Same Serde bridge as the Parquet module, with `arrow::ipc` doing the
//! encoding. The IPC file reader needs to seek to the footer, so reads spool
//! the stream to a temporary file first; the writer is stream-friendly and
//! writes straight through.

use anyhow::{Context, Result};
use arrow::datatypes::FieldRef;
use arrow::ipc::reader::FileReader;
use arrow::ipc::writer::FileWriter;
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_arrow::schema::{SchemaLike, TracingOptions};
use serde_arrow::{from_record_batch, to_record_batch};
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Write a typed slice as an Arrow IPC file to a stream.
///
/// # Returns
/// The number of rows written (`data.len()`).
///
/// # Errors
/// Returns an error if schema inference, row conversion, or writing fails.
pub fn write_feather_records<T, W>(writer: W, data: &[T]) -> Result<usize>
where
    T: Serialize + Deserialize<'static>,
    W: Write,
{
    let fields: Vec<FieldRef> = Vec::<FieldRef>::from_type::<T>(TracingOptions::default())
        .context("infer Arrow schema from row type")?;
    let batch: RecordBatch =
        to_record_batch(&fields, &data).context("convert rows to RecordBatch")?;

    let schema = batch.schema();
    let mut wtr = FileWriter::try_new(writer, &schema).context("create IPC FileWriter")?;
    wtr.write(&batch).context("write batch to IPC file")?;
    wtr.finish().context("finish IPC file")?;

    Ok(data.len())
}

/// Read an Arrow IPC file stream into a typed `Vec<T>`.
///
/// The stream is spooled to a temporary file so the reader can seek to the
/// footer.
///
/// # Errors
/// Returns an error if spooling fails, the reader cannot be built, or batch
/// conversion to `T` fails.
pub fn read_feather_records<T: DeserializeOwned>(mut reader: impl Read) -> Result<Vec<T>> {
    let mut spool = tempfile::tempfile().context("create spool file")?;
    io::copy(&mut reader, &mut spool).context("spool IPC stream")?;
    spool.seek(SeekFrom::Start(0))?;

    let rdr = FileReader::try_new(spool, None).context("open IPC FileReader")?;

    let mut out: Vec<T> = Vec::new();
    for batch in rdr {
        let batch = batch.context("read next batch")?;
        let mut rows: Vec<T> =
            from_record_batch(&batch).context("deserialize RecordBatch rows")?;
        out.append(&mut rows);
    }
    Ok(out)
}
