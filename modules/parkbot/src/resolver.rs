use std::sync::Arc;

use tracing::info;

use crate::error::{BotError, Result};
use crate::traits::ImageSearch;
use crate::types::{ImageCandidate, Site};

/// Query string sent to image search: `"<name> <location>"`.
pub fn search_query(site: &Site) -> String {
    format!("{} {}", site.name, site.location)
}

pub struct ImageResolver {
    search: Arc<dyn ImageSearch>,
}

impl ImageResolver {
    pub fn new(search: Arc<dyn ImageSearch>) -> Self {
        Self { search }
    }

    /// First image the provider returns for the site. No re-ranking.
    pub async fn resolve(&self, site: &Site) -> Result<ImageCandidate> {
        let query = search_query(site);
        let candidate = self
            .search
            .search(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BotError::NoImageFound {
                query: query.clone(),
            })?;

        info!(query = %query, url = %candidate.image_url, "Resolved image");
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_joins_name_and_location() {
        let site = Site::new("Glacier National Park", "West Glacier, MT");
        assert_eq!(search_query(&site), "Glacier National Park West Glacier, MT");
    }
}
