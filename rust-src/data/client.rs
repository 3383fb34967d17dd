//! HTTP client for the `/dashboard-data/` endpoint.

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::config::DASHBOARD_DATA_PATH;
use crate::models::{DashboardSnapshot, Period};

use super::FetchError;


/// Anything that can produce a dashboard snapshot for a period.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, period: &Period) -> Result<DashboardSnapshot, FetchError>;
}


/// Snapshot source backed by the analytics backend.
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: Client,
    url: Url,
}


impl HttpSnapshotSource {
    /// Create a source for the backend at `endpoint` (scheme, host and port).
    pub fn new(endpoint: &str) -> Result<Self, FetchError> {
        Self::with_client(Client::new(), endpoint)
    }

    /// Create a source that issues requests through an existing client.
    pub fn with_client(client: Client, endpoint: &str) -> Result<Self, FetchError> {
        let invalid = |reason: String| FetchError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };

        let base = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }

        let url = base
            .join(DASHBOARD_DATA_PATH)
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self { client, url })
    }

    /// Full request URL for a period.
    pub fn request_url(&self, period: &Period) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("period", period.as_str());
        url
    }
}


#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self, period: &Period) -> Result<DashboardSnapshot, FetchError> {
        let url = self.request_url(period);
        tracing::debug!(%url, "Requesting dashboard data");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let snapshot = serde_json::from_str(&body)?;

        Ok(snapshot)
    }
}
