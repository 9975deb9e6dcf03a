//! Organisation metadata assembly.
//!
//! [`MetadataService`] turns raw registry listings into the practice and region lists of
//! the published document:
//!
//! 1. [`retrieve_practices_with_identifiers`](MetadataService::retrieve_practices_with_identifiers)
//!    deduplicates practices and keeps those with identifiers. Its output is the
//!    *canonical practice list*.
//! 2. [`retrieve_region_practice_allocations`](MetadataService::retrieve_region_practice_allocations)
//!    deduplicates regions and allocates to each the canonical practices registered under it.
//!
//! Duplicate codes and identifier misses are reported to the injected
//! [`ObservabilityProbe`] and never abort the run. Registry failures propagate unchanged.

use std::collections::HashSet;

use tracing::info;

use crate::{
    fetcher::OrganisationSource,
    lookup::IdentifierLookup,
    models::organisation::{OrganisationRecord, PracticeRecord, RegionRecord},
    probe::ObservabilityProbe,
    registry::RegistryError,
};

pub struct MetadataService<S, P> {
    source: S,
    probe: P,
}

impl<S: OrganisationSource, P: ObservabilityProbe> MetadataService<S, P> {
    pub fn new(source: S, probe: P) -> Self {
        Self { source, probe }
    }

    /// Fetches all practices and joins them with their identifiers.
    ///
    /// The first record seen for a code wins; later duplicates are reported and dropped.
    /// Practices without identifiers are reported and excluded. Output keeps first-seen
    /// order.
    pub async fn retrieve_practices_with_identifiers(
        &self,
        lookup: &IdentifierLookup,
        include_extended_roles: bool,
    ) -> Result<Vec<PracticeRecord>, RegistryError> {
        let practices = self
            .source
            .fetch_all_practices(include_extended_roles)
            .await?;
        let fetched = practices.len();
        let unique_practices = self.remove_duplicate_organisations(practices);
        let unique = unique_practices.len();

        let matched: Vec<PracticeRecord> = unique_practices
            .into_iter()
            .filter_map(|practice| {
                if lookup.has_code(&practice.code) {
                    Some(PracticeRecord {
                        identifiers: lookup.identifiers_for(&practice.code).to_vec(),
                        code: practice.code,
                        name: practice.name,
                    })
                } else {
                    self.probe.record_identifiers_not_found(&practice.code);
                    None
                }
            })
            .collect();

        info!(
            fetched,
            unique,
            matched = matched.len(),
            include_extended_roles,
            "retrieved practices with identifiers"
        );
        Ok(matched)
    }

    /// Fetches all regions and the canonical practices registered under each.
    ///
    /// Every unique region is returned, including those left with no practices. Practice
    /// codes outside `canonical_practices` are dropped silently; the rest keep registry
    /// order.
    pub async fn retrieve_region_practice_allocations(
        &self,
        canonical_practices: &[PracticeRecord],
    ) -> Result<Vec<RegionRecord>, RegistryError> {
        let regions = self.source.fetch_all_regions().await?;
        let fetched = regions.len();
        let unique_regions = self.remove_duplicate_organisations(regions);

        let canonical_codes: HashSet<&str> = canonical_practices
            .iter()
            .map(|practice| practice.code.as_str())
            .collect();

        let mut allocations = Vec::with_capacity(unique_regions.len());
        for region in unique_regions {
            let allocation = self
                .fetch_region_practice_allocation(region, &canonical_codes)
                .await?;
            allocations.push(allocation);
        }

        info!(
            fetched,
            unique = allocations.len(),
            empty = allocations.iter().filter(|r| r.practices.is_empty()).count(),
            "retrieved region practice allocations"
        );
        Ok(allocations)
    }

    async fn fetch_region_practice_allocation(
        &self,
        region: OrganisationRecord,
        canonical_codes: &HashSet<&str>,
    ) -> Result<RegionRecord, RegistryError> {
        let region_practices = self.source.fetch_practices_for_region(&region.code).await?;

        Ok(RegionRecord {
            practices: region_practices
                .into_iter()
                .filter(|practice| canonical_codes.contains(practice.code.as_str()))
                .map(|practice| practice.code)
                .collect(),
            code: region.code,
            name: region.name,
        })
    }

    fn remove_duplicate_organisations(
        &self,
        organisations: Vec<OrganisationRecord>,
    ) -> Vec<OrganisationRecord> {
        let mut seen = HashSet::new();
        organisations
            .into_iter()
            .filter(|organisation| {
                let first = seen.insert(organisation.code.clone());
                if !first {
                    self.probe.record_duplicate_organisation(&organisation.code);
                }
                first
            })
            .collect()
    }
}
