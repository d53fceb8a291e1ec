use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::NetworkError;

/// Retrieves the raw text behind a URL.
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<String, NetworkError>;
}

/// Plain HTTP GET with a per-request timeout. No retries.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NetworkError::from_reqwest("<client>", e))?;
        Ok(HttpFetcher { client })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, NetworkError> {
        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| NetworkError::from_reqwest(url, e))?;

        let text = response
            .text()
            .await
            .map_err(|e| NetworkError::from_reqwest(url, e))?;

        debug!(
            url,
            bytes = text.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "fetched"
        );
        Ok(text)
    }
}
