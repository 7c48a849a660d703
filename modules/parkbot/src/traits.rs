// Trait seams for the posting cycle's network collaborators.
//
// ImageSearch wraps the image-search API, ImageFetcher the raw photo download,
// SocialNetwork the three Bluesky calls, Sleeper the scheduler's wait. Mocks for
// all four live in `crate::testing`.

use std::time::Duration;

use async_trait::async_trait;
use bluesky_client::{Blob, PostRecord, RecordRef};
use image_search_client::ImageSearchClient;

use crate::compress::CompressedImage;
use crate::error::Result;
use crate::types::{ImageCandidate, SessionToken};

#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Provider-ordered image hits for `query`. Only the first is ever used.
    async fn search(&self, query: &str) -> Result<Vec<ImageCandidate>>;
}

#[async_trait]
impl ImageSearch for ImageSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<ImageCandidate>> {
        let results = ImageSearchClient::search(self, query, 1).await?;
        Ok(results
            .into_iter()
            .map(|hit| ImageCandidate {
                image_url: hit.content_url,
                description: hit.name,
            })
            .collect())
    }
}

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Download the raw bytes behind `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait SocialNetwork: Send + Sync {
    async fn authenticate(&self) -> Result<SessionToken>;

    /// Takes ownership of the image; it is discarded once uploaded.
    async fn upload_blob(&self, token: &SessionToken, image: CompressedImage) -> Result<Blob>;

    async fn create_post(&self, token: &SessionToken, post: &PostRecord) -> Result<RecordRef>;
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock sleep.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
