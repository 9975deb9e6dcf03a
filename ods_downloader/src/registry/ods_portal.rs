pub mod client;
pub mod params;
pub mod response;
pub mod transport;

pub use client::{FETCH_FAILURE_MESSAGE, ODS_PORTAL_SEARCH_URL, RegistryClient};
pub use params::SearchFilters;
pub use response::{OrganisationsPage, RawOrganisation};
pub use transport::{NEXT_PAGE_HEADER, ReqwestTransport};
