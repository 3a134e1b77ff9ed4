//! Formats, read/write options, and the encoding check.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported dataset formats.
///
/// All variants are always present; reading or writing a format whose
/// backend feature is disabled fails at runtime with an explanatory error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    /// Comma-separated values (`csv` crate).
    Csv,
    /// Newline-delimited JSON records (`serde_json`).
    Json,
    /// Apache Parquet (`parquet` + `arrow`).
    Parquet,
    /// Feather / Arrow IPC file (`arrow::ipc`).
    Feather,
}

impl DataFormat {
    /// Lowercase format name, matching what [`FromStr`] accepts.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Parquet => "parquet",
            Self::Feather => "feather",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" | "jsonl" => Ok(Self::Json),
            "parquet" => Ok(Self::Parquet),
            "feather" => Ok(Self::Feather),
            other => Err(anyhow::anyhow!("unknown dataset format {other:?}")),
        }
    }
}

/// Options for [`read_df`](crate::read_df).
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Treat the first CSV row as a header (default `true`). Ignored by
    /// other formats.
    pub has_headers: bool,
    /// Expected text encoding. Only UTF-8 is supported; anything else is
    /// rejected up front with [`EncodingError`].
    pub encoding: Option<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            has_headers: true,
            encoding: None,
        }
    }
}

/// Options for [`write_df`](crate::write_df).
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Additional destinations that receive the same bytes as the primary
    /// path, written in parallel.
    pub copy_paths: Vec<String>,
    /// Compression level for the codec selected by the primary path's
    /// suffix. Codec default when `None`; ignored without a compressing
    /// suffix.
    pub compression_level: Option<u32>,
    /// Part size for chunked text formats (CSV flush interval, JSON part
    /// split). Ignored by binary formats.
    pub chunk_size: Option<usize>,
    /// Emit a CSV header row (default `true`). Ignored by other formats.
    pub has_headers: bool,
    /// Output text encoding. Only UTF-8 is supported; anything else is
    /// rejected up front with [`EncodingError`].
    pub encoding: Option<String>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            copy_paths: Vec::new(),
            compression_level: None,
            chunk_size: None,
            has_headers: true,
            encoding: None,
        }
    }
}

impl WriteOptions {
    /// Set the extra destination paths.
    #[must_use]
    pub fn with_copy_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.copy_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Set the compression level.
    #[must_use]
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Set the chunk size for chunked text formats.
    #[must_use]
    pub fn with_chunk_size(mut self, rows: usize) -> Self {
        self.chunk_size = Some(rows);
        self
    }
}

/// An encoding option this crate cannot honor.
///
/// Raised for both real-but-unsupported encodings (`iso-8859-1`) and names
/// that are not encodings at all; callers distinguish neither.
#[derive(Debug, Error)]
#[error("unsupported encoding {encoding:?}: only UTF-8 is supported")]
pub struct EncodingError {
    /// The encoding name as given by the caller.
    pub encoding: String,
}

/// Accept `None` and any spelling of UTF-8; reject everything else.
pub(crate) fn validate_encoding(encoding: Option<&str>) -> Result<(), EncodingError> {
    match encoding {
        None => Ok(()),
        Some(name) => {
            let normalized: String = name
                .chars()
                .filter(|c| *c != '-' && *c != '_')
                .collect::<String>()
                .to_ascii_lowercase();
            if normalized == "utf8" {
                Ok(())
            } else {
                Err(EncodingError {
                    encoding: name.to_string(),
                })
            }
        }
    }
}
