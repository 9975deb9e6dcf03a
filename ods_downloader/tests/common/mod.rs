#![allow(dead_code)]

use std::{collections::HashMap, io::Write, sync::Mutex};

use async_trait::async_trait;
use flate2::{Compression, write::GzEncoder};
use ods_downloader::{
    fetcher::OrganisationSource,
    lookup::{IdentifierLookup, IdentifierRow},
    models::organisation::OrganisationRecord,
    probe::ObservabilityProbe,
    registry::{FetchSnafu, RegistryError, ods_portal::FETCH_FAILURE_MESSAGE},
};

pub fn org(code: &str, name: &str) -> OrganisationRecord {
    OrganisationRecord::new(code, name)
}

pub fn lookup(pairs: &[(&str, &str)]) -> IdentifierLookup {
    pairs
        .iter()
        .map(|(code, identifier)| IdentifierRow::new(*code, *identifier))
        .collect()
}

/// In-memory registry with canned listings.
#[derive(Default)]
pub struct FakeOrganisationSource {
    pub practices: Vec<OrganisationRecord>,
    pub extended_practices: Vec<OrganisationRecord>,
    pub regions: Vec<OrganisationRecord>,
    pub region_practices: HashMap<String, Vec<OrganisationRecord>>,
    /// When set, every fetch fails with this HTTP status.
    pub failing_status: Option<u16>,
    pub region_calls: Mutex<Vec<String>>,
}

impl FakeOrganisationSource {
    pub fn with_practices(practices: Vec<OrganisationRecord>) -> Self {
        Self {
            practices,
            ..Self::default()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            failing_status: Some(status),
            ..Self::default()
        }
    }

    pub fn region(mut self, region: OrganisationRecord, practices: Vec<OrganisationRecord>) -> Self {
        self.region_practices.insert(region.code.clone(), practices);
        self.regions.push(region);
        self
    }

    fn respond(
        &self,
        records: &[OrganisationRecord],
    ) -> Result<Vec<OrganisationRecord>, RegistryError> {
        match self.failing_status {
            Some(status) => FetchSnafu {
                status,
                message: FETCH_FAILURE_MESSAGE,
            }
            .fail(),
            None => Ok(records.to_vec()),
        }
    }
}

#[async_trait]
impl OrganisationSource for FakeOrganisationSource {
    async fn fetch_all_practices(
        &self,
        include_extended_roles: bool,
    ) -> Result<Vec<OrganisationRecord>, RegistryError> {
        if include_extended_roles {
            self.respond(&self.extended_practices)
        } else {
            self.respond(&self.practices)
        }
    }

    async fn fetch_all_regions(&self) -> Result<Vec<OrganisationRecord>, RegistryError> {
        self.respond(&self.regions)
    }

    async fn fetch_practices_for_region(
        &self,
        region_code: &str,
    ) -> Result<Vec<OrganisationRecord>, RegistryError> {
        self.region_calls
            .lock()
            .unwrap()
            .push(region_code.to_string());
        let practices = self
            .region_practices
            .get(region_code)
            .cloned()
            .unwrap_or_default();
        self.respond(&practices)
    }
}

// Lets a test keep the source to inspect its call log after the run.
#[async_trait]
impl OrganisationSource for &FakeOrganisationSource {
    async fn fetch_all_practices(
        &self,
        include_extended_roles: bool,
    ) -> Result<Vec<OrganisationRecord>, RegistryError> {
        (**self).fetch_all_practices(include_extended_roles).await
    }

    async fn fetch_all_regions(&self) -> Result<Vec<OrganisationRecord>, RegistryError> {
        (**self).fetch_all_regions().await
    }

    async fn fetch_practices_for_region(
        &self,
        region_code: &str,
    ) -> Result<Vec<OrganisationRecord>, RegistryError> {
        (**self).fetch_practices_for_region(region_code).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeEvent {
    IdentifiersNotFound(String),
    DuplicateOrganisation(String),
}

#[derive(Default)]
pub struct RecordingProbe {
    events: Mutex<Vec<ProbeEvent>>,
}

impl RecordingProbe {
    pub fn events(&self) -> Vec<ProbeEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ObservabilityProbe for RecordingProbe {
    fn record_identifiers_not_found(&self, ods_code: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ProbeEvent::IdentifiersNotFound(ods_code.to_string()));
    }

    fn record_duplicate_organisation(&self, ods_code: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ProbeEvent::DuplicateOrganisation(ods_code.to_string()));
    }
}

pub fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}
