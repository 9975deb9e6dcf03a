//! One monthly job run.
//!
//! Steps, strictly in sequence:
//! 1. load the identifier lookup for the anchor month (falling back to the previous
//!    month when this month's export has not landed yet),
//! 2. fetch and join practices,
//! 3. fetch regions and allocate the canonical practices to them,
//! 4. assemble the document,
//! 5. write it with `date-anchor` and `build-tag` metadata.
//!
//! Any failure before step 5 aborts the run without writing anything.

use chrono::Datelike;
use indexmap::IndexMap;
use tracing::{info, warn};

use crate::{
    clock::Clock,
    config::DownloaderConfig,
    errors::Error,
    fetcher::OrganisationSource,
    io::{
        gzip_csv::read_gzip_csv,
        json::write_json,
        store::{ObjectStore, ObjectUri},
    },
    lookup::IdentifierLookup,
    models::metadata::MetadataDocument,
    probe::ObservabilityProbe,
    service::MetadataService,
    uris::ObjectUriResolver,
};

pub const DATE_ANCHOR_METADATA_KEY: &str = "date-anchor";
pub const BUILD_TAG_METADATA_KEY: &str = "build-tag";

pub struct OdsDownloader<S, P, St> {
    config: DownloaderConfig,
    uris: ObjectUriResolver,
    service: MetadataService<S, P>,
    store: St,
    clock: Box<dyn Clock + Send + Sync>,
}

impl<S, P, St> OdsDownloader<S, P, St>
where
    S: OrganisationSource,
    P: ObservabilityProbe,
    St: ObjectStore,
{
    pub fn new(
        config: DownloaderConfig,
        service: MetadataService<S, P>,
        store: St,
        clock: impl Clock + Send + Sync + 'static,
    ) -> Self {
        let uris = ObjectUriResolver::new(&config.mapping_bucket, &config.output_bucket);
        Self {
            config,
            uris,
            service,
            store,
            clock: Box::new(clock),
        }
    }

    /// Builds the document and writes it, returning where it was written.
    pub async fn run(&self) -> Result<ObjectUri, Error> {
        let document = self.build_document().await?;
        self.write_document(&document).await
    }

    /// Builds the document without writing it.
    pub async fn build_document(&self) -> Result<MetadataDocument, Error> {
        let anchor = self.config.date_anchor;
        let lookup = self.read_most_recent_identifier_lookup().await?;

        let practices = self
            .service
            .retrieve_practices_with_identifiers(&lookup, self.config.include_extended_roles)
            .await?;
        let regions = self
            .service
            .retrieve_region_practice_allocations(&practices)
            .await?;

        Ok(MetadataDocument::assemble(
            practices,
            regions,
            anchor.year(),
            anchor.month(),
            self.clock.as_ref(),
        ))
    }

    async fn read_identifier_lookup(&self, uri: &ObjectUri) -> Result<IdentifierLookup, Error> {
        let bytes = self.store.get(uri).await?;
        let rows = read_gzip_csv(&bytes)?;
        let lookup = IdentifierLookup::from_spine_directory_format(rows)?;
        if lookup.is_empty() {
            warn!(uri = %uri, "identifier lookup has no rows, every practice will be excluded");
        } else {
            info!(uri = %uri, codes = lookup.len(), "read identifier lookup");
        }
        Ok(lookup)
    }

    async fn read_most_recent_identifier_lookup(&self) -> Result<IdentifierLookup, Error> {
        let anchor = self.config.date_anchor;
        let uri = self.uris.identifier_lookup(anchor);

        match self.read_identifier_lookup(&uri).await {
            Err(Error::Store(err)) if err.is_not_found() => {
                let fallback = self.uris.previous_month_identifier_lookup(anchor);
                warn!(
                    missing = %uri,
                    fallback = %fallback,
                    "identifier lookup not found, using previous month"
                );
                self.read_identifier_lookup(&fallback).await
            }
            other => other,
        }
    }

    async fn write_document(&self, document: &MetadataDocument) -> Result<ObjectUri, Error> {
        let uri = self.uris.metadata(self.config.date_anchor);
        let metadata = IndexMap::from([
            (
                DATE_ANCHOR_METADATA_KEY.to_string(),
                self.config.date_anchor.to_rfc3339(),
            ),
            (
                BUILD_TAG_METADATA_KEY.to_string(),
                self.config.build_tag.clone(),
            ),
        ]);

        write_json(&self.store, &uri, document, &metadata).await?;
        info!(
            uri = %uri,
            practices = document.practices.len(),
            regions = document.regions.len(),
            "wrote organisation metadata"
        );
        Ok(uri)
    }
}
