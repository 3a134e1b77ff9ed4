//! # df-io
//!
//! Helpers for reading and writing **tabular datasets** — typed row structs
//! mapped through Serde — on local or remote paths, with transparent
//! compression and parallel multi-destination writes.
//!
//! ## Key Features
//!
//! - **Two-call surface** - [`read_df`] and [`write_df`] cover the whole API
//! - **Suffix-selected compression** - `.gz`, `.bz2`, `.zst`/`.zstd`, `.xz`
//!   stack a codec onto the stream automatically; custom codecs plug in via
//!   [`register_codec`]
//! - **Fan-out writes** - one logical write mirrored to N destination paths
//!   in parallel, all destinations receiving identical bytes
//! - **Pluggable transports** - `scheme://` prefixes route to registered
//!   [`Transport`]s; local files need no prefix, and an in-memory object
//!   store ([`MemoryTransport`]) stands in for remote storage in tests
//! - **Format backends** - CSV, newline-delimited JSON, Parquet, and Feather
//!   (all optional via feature flags)
//!
//! ## Quick Start
//!
//! ```no_run
//! use df_io::{DataFormat, ReadOptions, WriteOptions, read_df, write_df};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Row {
//!     id: u32,
//!     name: String,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let rows = vec![Row { id: 1, name: "a".into() }, Row { id: 2, name: "b".into() }];
//!
//! // Compressed write to a primary path plus two mirrored copies.
//! let options = WriteOptions::default()
//!     .with_copy_paths(["copy1/rows.csv.gz", "copy2/rows.csv.gz"]);
//! write_df(&rows, "out/rows.csv.gz", DataFormat::Csv, &options)?;
//!
//! let back: Vec<Row> = read_df("out/rows.csv.gz", DataFormat::Csv, &ReadOptions::default())?;
//! assert_eq!(back, rows);
//! # Ok(())
//! # }
//! ```
//!
//! ## How a write is assembled
//!
//! [`write_df`] opens one raw handle per destination, wraps them all in a
//! [`FanoutWriter`] (a bounded worker pool, one worker per handle, each chunk
//! mirrored to every handle before the next chunk starts), stacks the
//! compression encoder selected by the primary path's suffix on top, and
//! hands the top of the stack to the format writer. Finalization runs in
//! reverse stacking order through [`FinishWrite::finish`]: encoder trailer,
//! then fan-out, then every handle.
//!
//! There is no retry, no timeout, and no partial-success reporting: the call
//! returns once every destination holds the complete output, and the first
//! failure anywhere in the stack surfaces as the call's error.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Effect |
//! |---------|---------|--------|
//! | `io-csv` | yes | CSV backend (`csv`) |
//! | `io-json` | yes | Newline-delimited JSON backend (`serde_json`) |
//! | `io-parquet` | yes | Parquet backend (`parquet`, `arrow`, `serde_arrow`) |
//! | `io-feather` | yes | Feather / Arrow IPC backend (`arrow`, `serde_arrow`) |
//! | `compression-gzip` | yes | Gzip codec (`flate2`) |
//! | `compression-zstd` | yes | Zstd codec (`zstd`) |
//! | `compression-bzip2` | yes | Bzip2 codec (`bzip2`) |
//! | `compression-xz` | yes | Xz codec (`xz2`) |

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod io;
pub mod options;

mod read;
mod write;

pub use io::compression::{CompressionCodec, auto_detect_reader, auto_detect_writer, register_codec};
pub use io::fanout::FanoutWriter;
pub use io::sink::FinishWrite;
pub use io::transport::{LocalTransport, MemoryTransport, Transport, register_transport};
pub use options::{DataFormat, EncodingError, ReadOptions, WriteOptions};
pub use read::read_df;
pub use write::write_df;
