//! Access to the organisation registry (the ODS ORD search API).
//!
//! This module defines the [`RegistryTransport`] trait, the single seam through which
//! the crate talks HTTP to the registry, and the [`RegistryError`] type every registry
//! read returns.
//!
//! The [`ods_portal`] submodule builds on the transport: it knows the search URL, the
//! fixed filter templates, the JSON payload shape and the `Next-Page` pagination scheme.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use ods_downloader::registry::{RegistryError, RegistryPage, RegistryTransport};
//!
//! struct EmptyRegistry;
//!
//! #[async_trait]
//! impl RegistryTransport for EmptyRegistry {
//!     async fn get(
//!         &self,
//!         _url: &str,
//!         _query: &[(String, String)],
//!     ) -> Result<RegistryPage, RegistryError> {
//!         Ok(RegistryPage {
//!             status: 200,
//!             next_page: None,
//!             body: br#"{"Organisations": []}"#.to_vec(),
//!         })
//!     }
//! }
//! ```
//!

pub mod ods_portal;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

/// One raw HTTP response from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryPage {
    /// HTTP status code.
    pub status: u16,
    /// Fully qualified URL of the following page, taken from the `Next-Page` header.
    pub next_page: Option<String>,
    /// Undecoded response body.
    pub body: Vec<u8>,
}

/// Issues a single GET against the registry.
///
/// Implementations perform no status checking and no pagination; both belong to
/// [`ods_portal::RegistryClient`].
#[async_trait]
pub trait RegistryTransport {
    /// Requests `url` with `query` appended as the query string.
    ///
    /// An empty `query` means the URL is already fully qualified (a continuation URL).
    async fn get(&self, url: &str, query: &[(String, String)])
    -> Result<RegistryPage, RegistryError>;
}

/// Errors that can occur while reading from the registry.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RegistryError {
    /// The registry answered with a non-200 status.
    #[snafu(display("{message} (HTTP status {status})"))]
    Fetch {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The request never produced a response (connection, TLS, body read failure).
    #[snafu(display("Registry request failed: {source}"))]
    Transport {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The response body was not the expected Organisations document.
    #[snafu(display("Unexpected registry response body: {source}"))]
    Decode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}

impl RegistryError {
    /// The HTTP status of a [`RegistryError::Fetch`], if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RegistryError::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}
