//! Write-then-read equality across formats, codecs, and chunk sizes.

use df_io::{DataFormat, ReadOptions, WriteOptions, read_df, write_df};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Record {
    id: u32,
    name: String,
    value: f64,
}

fn sample_data(n: u32) -> Vec<Record> {
    (0..n)
        .map(|i| Record {
            id: i,
            name: format!("árvíztűrő tükörfúrógép {i}"),
            value: f64::from(i) * 0.5,
        })
        .collect()
}

fn roundtrip(filename: &str, format: DataFormat, options: &WriteOptions) -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join(filename);
    let path = path.to_str().expect("utf-8 temp path");

    let data = sample_data(100);
    let n = write_df(&data, path, format, options)?;
    assert_eq!(n, data.len());
    assert!(std::fs::metadata(path)?.len() > 0);

    let back: Vec<Record> = read_df(path, format, &ReadOptions::default())?;
    assert_eq!(back, data);
    Ok(())
}

#[cfg(feature = "io-csv")]
#[test]
fn csv_roundtrip() -> anyhow::Result<()> {
    roundtrip("rows.csv", DataFormat::Csv, &WriteOptions::default())
}

#[cfg(feature = "io-json")]
#[test]
fn json_roundtrip() -> anyhow::Result<()> {
    roundtrip("rows.json", DataFormat::Json, &WriteOptions::default())
}

#[cfg(feature = "io-parquet")]
#[test]
fn parquet_roundtrip() -> anyhow::Result<()> {
    roundtrip("rows.parquet", DataFormat::Parquet, &WriteOptions::default())
}

#[cfg(feature = "io-feather")]
#[test]
fn feather_roundtrip() -> anyhow::Result<()> {
    roundtrip("rows.feather", DataFormat::Feather, &WriteOptions::default())
}

#[cfg(all(feature = "io-csv", feature = "compression-gzip"))]
#[test]
fn csv_gzip_roundtrip() -> anyhow::Result<()> {
    roundtrip("rows.csv.gz", DataFormat::Csv, &WriteOptions::default())
}

#[cfg(all(feature = "io-csv", feature = "compression-xz"))]
#[test]
fn csv_xz_roundtrip() -> anyhow::Result<()> {
    roundtrip("rows.csv.xz", DataFormat::Csv, &WriteOptions::default())
}

#[cfg(all(feature = "io-json", feature = "compression-bzip2"))]
#[test]
fn json_bzip2_roundtrip() -> anyhow::Result<()> {
    roundtrip("rows.json.bz2", DataFormat::Json, &WriteOptions::default())
}

#[cfg(all(feature = "io-json", feature = "compression-zstd"))]
#[test]
fn json_zstd_chunked_roundtrip() -> anyhow::Result<()> {
    let options = WriteOptions::default()
        .with_chunk_size(32)
        .with_compression_level(19);
    roundtrip("rows.json.zst", DataFormat::Json, &options)
}

// Exercises the spool-to-temp-file path: the parquet reader must seek, which
// the zstd decompressor cannot provide.
#[cfg(all(feature = "io-parquet", feature = "compression-zstd"))]
#[test]
fn parquet_zstd_roundtrip() -> anyhow::Result<()> {
    roundtrip("rows.parquet.zst", DataFormat::Parquet, &WriteOptions::default())
}

#[cfg(all(feature = "io-feather", feature = "compression-gzip"))]
#[test]
fn feather_gzip_roundtrip() -> anyhow::Result<()> {
    let options = WriteOptions::default().with_compression_level(9);
    roundtrip("rows.feather.gz", DataFormat::Feather, &options)
}

#[cfg(all(feature = "io-csv", feature = "compression-gzip"))]
#[test]
fn chunked_csv_gzip_roundtrip() -> anyhow::Result<()> {
    let options = WriteOptions::default().with_chunk_size(7);
    roundtrip("rows.csv.gz", DataFormat::Csv, &options)
}

#[cfg(feature = "io-json")]
#[test]
fn chunked_json_matches_unchunked_bytes() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let plain = tmp.path().join("plain.json");
    let chunked = tmp.path().join("chunked.json");
    let data = sample_data(100);

    write_df(
        &data,
        plain.to_str().expect("utf-8 temp path"),
        DataFormat::Json,
        &WriteOptions::default(),
    )?;
    write_df(
        &data,
        chunked.to_str().expect("utf-8 temp path"),
        DataFormat::Json,
        &WriteOptions::default().with_chunk_size(32),
    )?;

    assert_eq!(std::fs::read(&plain)?, std::fs::read(&chunked)?);
    Ok(())
}

#[cfg(all(feature = "io-json", feature = "compression-gzip"))]
#[test]
fn written_file_is_actually_compressed() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("rows.json.gz");
    let path = path.to_str().expect("utf-8 temp path");

    let data = sample_data(1000);
    write_df(&data, path, DataFormat::Json, &WriteOptions::default())?;

    let compressed_size = std::fs::metadata(path)?.len();
    let uncompressed_size = serde_json::to_string(&data)?.len() as u64;
    assert!(compressed_size < uncompressed_size);
    Ok(())
}

#[cfg(feature = "io-csv")]
#[test]
fn empty_dataset_roundtrip_csv() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("empty.csv");
    let path = path.to_str().expect("utf-8 temp path");

    let data: Vec<Record> = vec![];
    let n = write_df(&data, path, DataFormat::Csv, &WriteOptions::default())?;
    assert_eq!(n, 0);

    let back: Vec<Record> = read_df(path, DataFormat::Csv, &ReadOptions::default())?;
    assert!(back.is_empty());
    Ok(())
}

#[cfg(feature = "io-parquet")]
#[test]
fn empty_dataset_roundtrip_parquet() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("empty.parquet");
    let path = path.to_str().expect("utf-8 temp path");

    let data: Vec<Record> = vec![];
    write_df(&data, path, DataFormat::Parquet, &WriteOptions::default())?;

    let back: Vec<Record> = read_df(path, DataFormat::Parquet, &ReadOptions::default())?;
    assert!(back.is_empty());
    Ok(())
}

#[test]
fn format_names_parse() {
    use std::str::FromStr;
    assert_eq!(DataFormat::from_str("csv").unwrap(), DataFormat::Csv);
    assert_eq!(DataFormat::from_str("jsonl").unwrap(), DataFormat::Json);
    assert_eq!(DataFormat::from_str("Parquet").unwrap(), DataFormat::Parquet);
    assert_eq!(DataFormat::from_str("feather").unwrap(), DataFormat::Feather);
    assert!(DataFormat::from_str("pickle").is_err());
}
