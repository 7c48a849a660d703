use async_trait::async_trait;

use crate::error::{BotError, Result};
use crate::traits::ImageFetcher;

/// Downloads source photos over plain HTTP GET.
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_error = |message: String| BotError::ImageFetch {
            url: url.to_string(),
            message,
        };

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fetch_error(format!("status {status}")));
        }

        let bytes = resp.bytes().await.map_err(|e| fetch_error(e.to_string()))?;
        tracing::debug!(url, size = bytes.len(), "Fetched source image");
        Ok(bytes.to_vec())
    }
}
