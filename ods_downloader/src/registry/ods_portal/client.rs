use snafu::ResultExt;
use tracing::debug;

use crate::registry::{
    DecodeSnafu, FetchSnafu, RegistryError, RegistryPage, RegistryTransport,
    ods_portal::{OrganisationsPage, RawOrganisation, SearchFilters},
};

pub const ODS_PORTAL_SEARCH_URL: &str =
    "https://directory.spineservices.nhs.uk/ORD/2-0-0/organisations";

pub const FETCH_FAILURE_MESSAGE: &str = "Unable to fetch organisation data";

/// Searches the registry and follows its pagination to the end.
pub struct RegistryClient<T> {
    transport: T,
    search_url: String,
}

impl<T: RegistryTransport> RegistryClient<T> {
    pub fn new(transport: T, search_url: impl Into<String>) -> Self {
        Self {
            transport,
            search_url: search_url.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches every organisation matching `filters`, across all pages.
    ///
    /// The first request goes to the search URL with `filters`; each follow-up goes to
    /// the exact URL named by the previous response's `Next-Page` header, with no
    /// filters re-applied. A non-200 status on any page aborts the whole fetch.
    pub async fn fetch_organisations(
        &self,
        filters: &SearchFilters,
    ) -> Result<Vec<RawOrganisation>, RegistryError> {
        let mut organisations = Vec::new();
        let mut url = self.search_url.clone();
        let mut query = filters.to_query();

        loop {
            let mut page = self.transport.get(&url, &query).await?;
            let next_page = page.next_page.take();

            let page_organisations = decode_page(page)?;
            debug!(
                url = %url,
                organisations = page_organisations.len(),
                "fetched registry page"
            );
            organisations.extend(page_organisations);

            match next_page {
                Some(next_url) => {
                    url = next_url;
                    query.clear();
                }
                None => break,
            }
        }

        Ok(organisations)
    }
}

fn decode_page(page: RegistryPage) -> Result<Vec<RawOrganisation>, RegistryError> {
    if page.status != 200 {
        return FetchSnafu {
            status: page.status,
            message: FETCH_FAILURE_MESSAGE,
        }
        .fail();
    }

    let decoded: OrganisationsPage = serde_json::from_slice(&page.body).context(DecodeSnafu)?;
    Ok(decoded.organisations)
}
