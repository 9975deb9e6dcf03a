use async_trait::async_trait;
use reqwest::Client;
use snafu::ResultExt;

use crate::registry::{RegistryError, RegistryPage, RegistryTransport, TransportSnafu};

/// Response header carrying the fully qualified URL of the next page.
pub const NEXT_PAGE_HEADER: &str = "Next-Page";

/// [`RegistryTransport`] backed by a reqwest async client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport that identifies itself with the crate's user agent.
    pub fn new() -> Result<Self, RegistryError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context(TransportSnafu)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RegistryTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<RegistryPage, RegistryError> {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.context(TransportSnafu)?;

        let status = response.status().as_u16();
        let next_page = response
            .headers()
            .get(NEXT_PAGE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.context(TransportSnafu)?.to_vec();

        Ok(RegistryPage {
            status,
            next_page,
            body,
        })
    }
}
