pub mod compression;
pub mod fanout;
pub mod sink;
pub mod transport;

#[cfg_attr(docsrs, doc(cfg(feature = "io-csv")))]
#[cfg(feature = "io-csv")]
pub mod csv;

#[cfg_attr(docsrs, doc(cfg(feature = "io-json")))]
#[cfg(feature = "io-json")]
pub mod json;

#[cfg_attr(docsrs, doc(cfg(feature = "io-parquet")))]
#[cfg(feature = "io-parquet")]
pub mod parquet;

#[cfg_attr(docsrs, doc(cfg(feature = "io-feather")))]
#[cfg(feature = "io-feather")]
pub mod feather;
