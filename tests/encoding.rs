//! Encoding options: one error class for wrong and unrecognized names alike.

#![cfg(feature = "io-csv")]

use df_io::{DataFormat, EncodingError, ReadOptions, WriteOptions, read_df, write_df};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Record {
    id: u32,
    name: String,
}

fn sample_data() -> Vec<Record> {
    vec![Record {
        id: 1,
        name: "árvíztűrő tükörfúrógép".to_string(),
    }]
}

fn write_with_encoding(encoding: &str) -> anyhow::Result<usize> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("rows.csv");
    let path = path.to_str().expect("utf-8 temp path");

    let options = WriteOptions {
        encoding: Some(encoding.to_string()),
        ..WriteOptions::default()
    };
    write_df(&sample_data(), path, DataFormat::Csv, &options)
}

#[test]
fn real_but_unsupported_encoding_fails_with_encoding_error() {
    let err = write_with_encoding("iso-8859-1").expect_err("write must fail");
    assert!(err.downcast_ref::<EncodingError>().is_some());
}

#[test]
fn unrecognized_encoding_fails_with_the_same_error_class() {
    let err = write_with_encoding("regergheh34h").expect_err("write must fail");
    assert!(err.downcast_ref::<EncodingError>().is_some());
}

#[test]
fn utf8_spellings_are_accepted() -> anyhow::Result<()> {
    for spelling in ["utf-8", "UTF-8", "UTF_8", "utf8"] {
        let n = write_with_encoding(spelling)?;
        assert_eq!(n, 1, "spelling {spelling} rejected");
    }
    Ok(())
}

#[test]
fn read_side_validates_encoding_too() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("rows.csv");
    let path = path.to_str().expect("utf-8 temp path");
    write_df(&sample_data(), path, DataFormat::Csv, &WriteOptions::default())?;

    let options = ReadOptions {
        encoding: Some("latin-1".to_string()),
        ..ReadOptions::default()
    };
    let err = read_df::<Record>(path, DataFormat::Csv, &options).expect_err("read must fail");
    assert!(err.downcast_ref::<EncodingError>().is_some());
    Ok(())
}
