use thiserror::Error;

use crate::{
    config::ConfigError,
    io::{gzip_csv::CsvError, store::StoreError},
    lookup::LookupError,
    registry::RegistryError,
};

/// The unified error type for the `ods_downloader` crate.
///
/// Every variant is fatal for a job run. Recoverable conditions (lookup
/// misses, duplicate organisation codes) never surface here; they are
/// reported through [`ObservabilityProbe`](crate::probe::ObservabilityProbe).
#[derive(Debug, Error)]
pub enum Error {
    /// The organisation registry could not be read.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The identifier source was readable but not in the expected shape.
    #[error("Identifier lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// The identifier source could not be decompressed or parsed.
    #[error("Identifier source error: {0}")]
    Csv(#[from] CsvError),

    /// Reading from or writing to object storage failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// An error related to configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
