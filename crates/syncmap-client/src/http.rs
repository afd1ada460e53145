//! HTTP transport to a remote aggregator.

use std::time::Duration;

use async_trait::async_trait;

use syncmap_core::{Patch, Snapshot};

use crate::error::{ClientError, Result};
use crate::transport::Aggregator;

/// Aggregator endpoint reached by `POST <url>` with a JSON patch body.
///
/// The response must be `200 OK` (or any 2xx) with the full merged map as a
/// JSON object of the same shape; anything else is a failed cycle for the
/// worker to log and skip.
pub struct HttpAggregator {
    url: reqwest::Url,
    client: reqwest::Client,
    request_timeout: Duration,
}

impl HttpAggregator {
    /// Build a client targeting the aggregator's merge endpoint.
    ///
    /// `request_timeout` bounds the whole exchange, connect included, so an
    /// unresponsive server costs one cycle rather than an indefinite wait.
    pub fn new(url: impl AsRef<str>, request_timeout: Duration) -> Result<Self> {
        let url = reqwest::Url::parse(url.as_ref())
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self {
            url,
            client,
            request_timeout,
        })
    }

    /// The configured merge endpoint.
    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }

    fn map_send_error(&self, error: reqwest::Error) -> ClientError {
        if error.is_timeout() {
            ClientError::Timeout(self.request_timeout)
        } else {
            ClientError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl Aggregator for HttpAggregator {
    async fn exchange(&self, patch: Patch) -> Result<Snapshot> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&patch)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        response
            .json::<Snapshot>()
            .await
            .map_err(|e| ClientError::MalformedSnapshot(e.to_string()))
    }
}
