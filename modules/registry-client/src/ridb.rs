use tracing::info;

use crate::types::{RidbRecAreasPage, Site};
use crate::{read_page, Result, PAGE_SIZE};

const BASE_URL: &str = "https://ridb.recreation.gov/api/v1";

/// Client for the Recreation Information Database `/recareas` endpoint.
pub struct RidbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RidbClient {
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

    /// Fetch one page of rec areas (with addresses) starting at `offset`.
    pub async fn fetch_page(&self, offset: u64) -> Result<RidbRecAreasPage> {
        let url = format!("{}/recareas", self.base_url);
        let resp = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .query(&[
                ("limit", PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
                ("full", "true".to_string()),
            ])
            .send()
            .await?;

        read_page(resp).await
    }

    /// Walk every page and return all rec areas not matching an exclusion.
    pub async fn fetch_rec_areas(&self) -> Result<Vec<Site>> {
        let mut offset = 0;
        let mut areas = Vec::new();

        loop {
            let page = self.fetch_page(offset).await?;
            let total = page.metadata.results.total_count;
            areas.extend(page.rec_data.into_iter().filter_map(|area| area.into_site()));

            offset += PAGE_SIZE;
            info!(
                count = areas.len(),
                offset, total, "Fetched rec areas, monuments, and forests so far"
            );

            if total <= offset {
                break;
            }
        }

        info!(count = areas.len(), "Fetched all rec areas");
        Ok(areas)
    }
}
