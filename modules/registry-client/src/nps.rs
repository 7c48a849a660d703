use tracing::info;

use crate::types::{NpsParksPage, Site};
use crate::{read_page, Result, PAGE_SIZE};

const BASE_URL: &str = "https://developer.nps.gov/api/v1";

/// Client for the National Park Service `/parks` endpoint.
pub struct NpsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NpsClient {
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

    /// Fetch one page of parks starting at `start`.
    pub async fn fetch_page(&self, start: u64) -> Result<NpsParksPage> {
        let url = format!("{}/parks", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.clone()),
                ("limit", PAGE_SIZE.to_string()),
                ("start", start.to_string()),
            ])
            .send()
            .await?;

        read_page(resp).await
    }

    /// Walk every page and return all national parks.
    pub async fn fetch_parks(&self) -> Result<Vec<Site>> {
        let mut offset = 0;
        let mut parks = Vec::new();

        loop {
            let page = self.fetch_page(offset).await?;
            let total = page.total;
            parks.extend(page.data.into_iter().filter_map(|park| park.into_site()));

            offset += PAGE_SIZE;
            info!(count = parks.len(), offset, total, "Fetched parks so far");

            if total <= offset {
                break;
            }
        }

        info!(count = parks.len(), "Fetched all parks");
        Ok(parks)
    }
}
