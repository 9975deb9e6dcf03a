//! Typed organisation lists for the three fixed registry queries.
//!
//! [`OrganisationSource`] is the seam the [`MetadataService`](crate::service::MetadataService)
//! depends on. [`RegistryOrganisationFetcher`] is its registry-backed implementation; tests
//! substitute an in-memory source.

use async_trait::async_trait;

use crate::{
    models::organisation::OrganisationRecord,
    registry::{
        RegistryError, RegistryTransport,
        ods_portal::{RegistryClient, SearchFilters},
    },
};

/// Supplies practices and regions. No deduplication happens at this layer.
#[async_trait]
pub trait OrganisationSource {
    /// All active practices.
    ///
    /// With `include_extended_roles` the broader cost-centre filter is used instead of
    /// the GP practice filter.
    async fn fetch_all_practices(
        &self,
        include_extended_roles: bool,
    ) -> Result<Vec<OrganisationRecord>, RegistryError>;

    /// All active regional administrative bodies.
    async fn fetch_all_regions(&self) -> Result<Vec<OrganisationRecord>, RegistryError>;

    /// Organisations registered under `region_code`, in registry order.
    async fn fetch_practices_for_region(
        &self,
        region_code: &str,
    ) -> Result<Vec<OrganisationRecord>, RegistryError>;
}

pub struct RegistryOrganisationFetcher<T> {
    client: RegistryClient<T>,
}

impl<T: RegistryTransport + Sync> RegistryOrganisationFetcher<T> {
    pub fn new(client: RegistryClient<T>) -> Self {
        Self { client }
    }

    async fn fetch(
        &self,
        filters: SearchFilters,
    ) -> Result<Vec<OrganisationRecord>, RegistryError> {
        let raw = self.client.fetch_organisations(&filters).await?;
        Ok(raw.into_iter().map(OrganisationRecord::from).collect())
    }
}

#[async_trait]
impl<T: RegistryTransport + Sync> OrganisationSource for RegistryOrganisationFetcher<T> {
    async fn fetch_all_practices(
        &self,
        include_extended_roles: bool,
    ) -> Result<Vec<OrganisationRecord>, RegistryError> {
        self.fetch(SearchFilters::practices(include_extended_roles))
            .await
    }

    async fn fetch_all_regions(&self) -> Result<Vec<OrganisationRecord>, RegistryError> {
        self.fetch(SearchFilters::regions()).await
    }

    async fn fetch_practices_for_region(
        &self,
        region_code: &str,
    ) -> Result<Vec<OrganisationRecord>, RegistryError> {
        self.fetch(SearchFilters::practices_for_region(region_code))
            .await
    }
}
