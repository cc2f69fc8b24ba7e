use std::time::Duration;

use reqwest::{Client, Url};
use tracing::{debug, warn};

use super::snapshot::StatusSnapshot;
use super::source::StatusSource;
use crate::error::PollerError;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches job status with a `GET` against a JSON status endpoint.
pub struct HttpStatusSource {
    // Shared reqwest client with connect and request timeouts applied.
    client: Client,
    // Validated http(s) endpoint polled on every fetch.
    url: Url,
}

impl HttpStatusSource {
    pub fn new(url: &str) -> Result<Self, PollerError> {
        Self::with_timeouts(url, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeouts(
        url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, PollerError> {
        let url = Url::parse(url).map_err(|e| PollerError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PollerError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme `{}`", url.scheme()),
            });
        }
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn try_fetch(&self) -> Result<StatusSnapshot, reqwest::Error> {
        let response = self
            .client
            .get(self.url.clone())
            .header("accept", "application/json")
            .send()
            .await?
            .error_for_status()?;
        response.json::<StatusSnapshot>().await
    }
}

impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self) -> StatusSnapshot {
        match self.try_fetch().await {
            Ok(snapshot) => {
                debug!(url = %self.url, status = %snapshot.status, "fetched status");
                snapshot
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "status fetch failed, reporting error status");
                StatusSnapshot::degraded()
            }
        }
    }
}
