//! Canonical in-memory representations of registry organisations.
//!
//! [`OrganisationRecord`] is what the [`OrganisationSource`](crate::fetcher::OrganisationSource)
//! hands back; [`PracticeRecord`] and [`RegionRecord`] are what the
//! [`MetadataService`](crate::service::MetadataService) derives from it and what ends up in
//! the published [`MetadataDocument`](crate::models::metadata::MetadataDocument).

use serde::{Deserialize, Serialize};

use crate::registry::ods_portal::RawOrganisation;

/// An organisation as listed by the registry, before any deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganisationRecord {
    /// The national organisation (ODS) code, e.g. "A12345".
    pub code: String,
    pub name: String,
}

impl OrganisationRecord {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

impl From<RawOrganisation> for OrganisationRecord {
    fn from(raw: RawOrganisation) -> Self {
        Self {
            code: raw.org_id,
            name: raw.name,
        }
    }
}

/// A practice that has at least one external identifier.
///
/// `identifiers` is never empty: practices without identifiers are excluded, not
/// recorded with an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeRecord {
    #[serde(rename = "ods_code")]
    pub code: String,
    pub name: String,
    /// External system identifiers (ASIDs), in source order.
    #[serde(rename = "asids")]
    pub identifiers: Vec<String>,
}

/// A regional administrative body and the canonical practices it administers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    #[serde(rename = "ods_code")]
    pub code: String,
    pub name: String,
    /// Practice codes in registry order. May be empty.
    pub practices: Vec<String>,
}
