use directory_core::UserRecord;
use reqwest::Client;
pub use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://randomuser.me/api";
pub const DEFAULT_RESULT_COUNT: u32 = 100;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid directory url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("directory request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("directory endpoint returned status {status}")]
    Status { status: StatusCode },
    #[error("directory response was not the expected shape: {source}")]
    Decode {
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Deserialize)]
struct DirectoryResponse {
    results: Vec<UserRecord>,
}

/// HTTP collaborator for the one-shot directory fetch.
///
/// Carries no retry, timeout, or cancellation machinery: the session issues
/// one fetch at startup and a failure leaves the batch unloaded.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: Client,
    endpoint: Url,
    result_count: u32,
}

impl DirectoryClient {
    pub fn new(endpoint: &str, result_count: u32) -> Result<Self, FetchError> {
        let endpoint = Url::parse(endpoint).map_err(|source| FetchError::InvalidUrl {
            url: endpoint.to_string(),
            source,
        })?;
        Ok(Self {
            http: Client::new(),
            endpoint,
            result_count,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches the whole batch in one GET; the endpoint responds with
    /// `{ "results": [...] }`. Unknown fields in the body are ignored.
    pub async fn fetch_users(&self) -> Result<Vec<UserRecord>, FetchError> {
        debug!(endpoint = %self.endpoint, results = self.result_count, "fetching user directory");
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("results", self.result_count)])
            .send()
            .await
            .map_err(|source| FetchError::Transport { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        let body: DirectoryResponse = response
            .json()
            .await
            .map_err(|source| FetchError::Decode { source })?;
        info!(count = body.results.len(), "fetched user directory batch");
        Ok(body.results)
    }

    /// Fetches the raw bytes behind a record's photo-thumbnail URL.
    pub async fn fetch_thumbnail(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport { source })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
