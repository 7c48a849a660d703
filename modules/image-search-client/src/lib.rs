pub mod error;
pub mod types;

pub use error::{Result, SearchError};
pub use types::{ImageResult, ImagesResponse};

const BASE_URL: &str = "https://api.bing.microsoft.com/v7.0";

/// Market sent with every query.
const MARKET: &str = "en-US";

pub struct ImageSearchClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ImageSearchClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Search for images matching `query`, returning at most `count` results in provider order.
    pub async fn search(&self, query: &str, count: u32) -> Result<Vec<ImageResult>> {
        let url = format!("{}/images/search", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .query(&[
                ("q", query.to_string()),
                ("count", count.to_string()),
                ("mkt", MARKET.to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let parsed: ImagesResponse = serde_json::from_str(&body)?;
        tracing::debug!(query, results = parsed.value.len(), "Image search complete");

        Ok(parsed.value)
    }
}
