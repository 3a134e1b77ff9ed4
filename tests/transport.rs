//! Transport resolution: local paths, `file://`, registered schemes, and the
//! in-memory object store.

#![cfg(feature = "io-json")]

use df_io::{
    DataFormat, MemoryTransport, ReadOptions, WriteOptions, read_df, register_transport, write_df,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Record {
    id: u32,
    name: String,
}

fn sample_data(n: u32) -> Vec<Record> {
    (0..n)
        .map(|i| Record {
            id: i,
            name: format!("row-{i}"),
        })
        .collect()
}

#[cfg(feature = "compression-gzip")]
#[test]
fn memory_transport_roundtrip() -> anyhow::Result<()> {
    let mem = MemoryTransport::new("mem1");
    register_transport(Arc::new(mem.clone()));

    let data = sample_data(200);
    let path = "mem1://bucket/rows.json.gz";
    write_df(&data, path, DataFormat::Json, &WriteOptions::default())?;

    assert_eq!(mem.object_count(), 1);
    assert!(mem.object(path).is_some_and(|bytes| !bytes.is_empty()));

    let back: Vec<Record> = read_df(path, DataFormat::Json, &ReadOptions::default())?;
    assert_eq!(back, data);
    Ok(())
}

#[test]
fn unknown_scheme_is_an_error() {
    let err = read_df::<Record>(
        "gopher://bucket/rows.json",
        DataFormat::Json,
        &ReadOptions::default(),
    )
    .expect_err("read must fail");
    assert!(err.to_string().contains("gopher"));
}

#[test]
fn missing_memory_object_is_not_found() {
    let mem = MemoryTransport::new("mem2");
    register_transport(Arc::new(mem));

    let err = read_df::<Record>(
        "mem2://bucket/absent.json",
        DataFormat::Json,
        &ReadOptions::default(),
    )
    .expect_err("read must fail");
    assert!(err.to_string().contains("absent"));
}

#[test]
fn file_scheme_matches_plain_path() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let plain = tmp.path().join("rows.json");
    let plain = plain.to_str().expect("utf-8 temp path");
    let uri = format!("file://{plain}");

    let data = sample_data(5);
    write_df(&data, &uri, DataFormat::Json, &WriteOptions::default())?;

    let back: Vec<Record> = read_df(plain, DataFormat::Json, &ReadOptions::default())?;
    assert_eq!(back, data);
    Ok(())
}

#[test]
fn write_creates_missing_parent_directories() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let nested = tmp.path().join("a/b/c/rows.json");
    let nested = nested.to_str().expect("utf-8 temp path");

    let data = sample_data(3);
    write_df(&data, nested, DataFormat::Json, &WriteOptions::default())?;

    let back: Vec<Record> = read_df(nested, DataFormat::Json, &ReadOptions::default())?;
    assert_eq!(back, data);
    Ok(())
}

// Local primary plus an object-store copy: both destinations must hold the
// same bytes, the memory side committed only on finish.
#[cfg(feature = "compression-zstd")]
#[test]
fn mixed_local_and_memory_copies_are_identical() -> anyhow::Result<()> {
    let mem = MemoryTransport::new("mem3");
    register_transport(Arc::new(mem.clone()));

    let tmp = tempfile::tempdir()?;
    let primary = tmp.path().join("rows.json.zst");
    let primary = primary.to_str().expect("utf-8 temp path");
    let copy = "mem3://bucket/rows.json.zst";

    let data = sample_data(300);
    let options = WriteOptions::default().with_copy_paths([copy]);
    write_df(&data, primary, DataFormat::Json, &options)?;

    let local_bytes = std::fs::read(primary)?;
    assert_eq!(mem.object(copy).expect("object committed"), local_bytes);

    let back: Vec<Record> = read_df(copy, DataFormat::Json, &ReadOptions::default())?;
    assert_eq!(back, data);
    Ok(())
}
