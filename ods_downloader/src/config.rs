//! Job configuration, resolved once from environment variables at startup.
//!
//! | Variable                 | Required | Default                      |
//! |--------------------------|----------|------------------------------|
//! | `OUTPUT_BUCKET`          | yes      |                              |
//! | `MAPPING_BUCKET`         | yes      |                              |
//! | `BUILD_TAG`              | yes      |                              |
//! | `DATE_ANCHOR`            | yes      |                              |
//! | `SEARCH_URL`             | no       | [`ODS_PORTAL_SEARCH_URL`]    |
//! | `S3_ENDPOINT_URL`        | no       | AWS S3                       |
//! | `OBJECT_STORE_ROOT`      | no       |                              |
//! | `INCLUDE_EXTENDED_ROLES` | no       | `false`                      |
//!
//! Objects live in S3 unless `OBJECT_STORE_ROOT` names a local directory instead. Setting
//! both `S3_ENDPOINT_URL` and `OBJECT_STORE_ROOT` is an error.
//!
//! `DATE_ANCHOR` is an RFC 3339 timestamp (`2021-07-01T00:00:00+00:00`) or a bare date
//! (`2021-07-01`, read as midnight UTC).

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use shared_utils::env::{EnvSource, MissingEnvVarError, require_var, var_or};
use thiserror::Error;

use crate::registry::ods_portal::ODS_PORTAL_SEARCH_URL;

pub const OUTPUT_BUCKET: &str = "OUTPUT_BUCKET";
pub const MAPPING_BUCKET: &str = "MAPPING_BUCKET";
pub const BUILD_TAG: &str = "BUILD_TAG";
pub const DATE_ANCHOR: &str = "DATE_ANCHOR";
pub const SEARCH_URL: &str = "SEARCH_URL";
pub const S3_ENDPOINT_URL: &str = "S3_ENDPOINT_URL";
pub const OBJECT_STORE_ROOT: &str = "OBJECT_STORE_ROOT";
pub const INCLUDE_EXTENDED_ROLES: &str = "INCLUDE_EXTENDED_ROLES";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVarError),

    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },

    #[error("{first} and {second} cannot both be set")]
    Conflicting {
        first: &'static str,
        second: &'static str,
    },
}

/// Where objects are read from and written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// AWS S3, or an S3-compatible service at `endpoint_url`.
    S3 { endpoint_url: Option<String> },
    /// A local directory holding `<bucket>/<key>` files.
    Local { root: PathBuf },
}

impl StorageConfig {
    fn from_env(source: &impl EnvSource) -> Result<Self, ConfigError> {
        match (source.var(S3_ENDPOINT_URL), source.var(OBJECT_STORE_ROOT)) {
            (Some(_), Some(_)) => Err(ConfigError::Conflicting {
                first: S3_ENDPOINT_URL,
                second: OBJECT_STORE_ROOT,
            }),
            (endpoint_url, None) => Ok(Self::S3 { endpoint_url }),
            (None, Some(root)) => Ok(Self::Local { root: root.into() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloaderConfig {
    /// Bucket the metadata document is written to.
    pub output_bucket: String,
    /// Bucket holding the monthly identifier lookups.
    pub mapping_bucket: String,
    /// Build identifier attached to the output as metadata.
    pub build_tag: String,
    /// Instant whose year and month select the input and output locations.
    pub date_anchor: DateTime<Utc>,
    pub search_url: String,
    pub storage: StorageConfig,
    /// Use the broader cost-centre practice filter.
    pub include_extended_roles: bool,
}

impl DownloaderConfig {
    pub fn from_env(source: &impl EnvSource) -> Result<Self, ConfigError> {
        let date_anchor = require_var(source, DATE_ANCHOR)?;
        let date_anchor = parse_date_anchor(&date_anchor).ok_or(ConfigError::InvalidValue {
            name: DATE_ANCHOR,
            value: date_anchor,
        })?;

        let include_extended_roles = match source.var(INCLUDE_EXTENDED_ROLES) {
            None => false,
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidValue {
                name: INCLUDE_EXTENDED_ROLES,
                value,
            })?,
        };

        Ok(Self {
            output_bucket: require_var(source, OUTPUT_BUCKET)?,
            mapping_bucket: require_var(source, MAPPING_BUCKET)?,
            build_tag: require_var(source, BUILD_TAG)?,
            date_anchor,
            search_url: var_or(source, SEARCH_URL, ODS_PORTAL_SEARCH_URL),
            storage: StorageConfig::from_env(source)?,
            include_extended_roles,
        })
    }
}

fn parse_date_anchor(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|anchor| anchor.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)
                .map(|midnight| midnight.and_utc())
        })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}
