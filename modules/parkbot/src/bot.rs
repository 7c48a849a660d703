use std::sync::Arc;

use bluesky_client::RecordRef;
use rand::rngs::StdRng;
use tracing::info;

use crate::compress::ImageCompressor;
use crate::error::{BotError, Result};
use crate::publisher::Publisher;
use crate::resolver::ImageResolver;
use crate::selector::SiteLists;
use crate::traits::ImageFetcher;
use crate::types::Site;

/// What one successful cycle posted.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub site: Site,
    pub image_url: String,
    pub compressed_size: usize,
    pub record: RecordRef,
}

/// One select → resolve → compress → publish pass, with its collaborators.
pub struct PostingBot {
    sites: SiteLists,
    rng: StdRng,
    resolver: ImageResolver,
    fetcher: Arc<dyn ImageFetcher>,
    compressor: ImageCompressor,
    publisher: Publisher,
}

impl PostingBot {
    pub fn new(
        sites: SiteLists,
        rng: StdRng,
        resolver: ImageResolver,
        fetcher: Arc<dyn ImageFetcher>,
        compressor: ImageCompressor,
        publisher: Publisher,
    ) -> Self {
        Self {
            sites,
            rng,
            resolver,
            fetcher,
            compressor,
            publisher,
        }
    }

    pub fn sites(&self) -> &SiteLists {
        &self.sites
    }

    /// Run one cycle. Every step is sequential; the first failure is returned as-is.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        info!("Picking random site...");
        let site = self
            .sites
            .pick(&mut self.rng)
            .cloned()
            .ok_or(BotError::NoSites)?;
        info!(name = %site.name, location = %site.location, "Picked site");

        info!("Fetching place photo...");
        let candidate = self.resolver.resolve(&site).await?;
        let source = self.fetcher.fetch(&candidate.image_url).await?;

        info!(size = source.len(), "Compressing image...");
        let compressor = self.compressor;
        let image = tokio::task::spawn_blocking(move || compressor.compress(&source))
            .await
            .map_err(|e| BotError::Task(e.to_string()))??;
        let compressed_size = image.len();

        info!("Posting to Bluesky...");
        let record = self.publisher.publish(&site, &candidate, image).await?;

        Ok(CycleReport {
            site,
            image_url: candidate.image_url,
            compressed_size,
            record,
        })
    }
}
