use thiserror::Error;

use image_search_client::SearchError;
use registry_client::RegistryError;

pub type Result<T> = std::result::Result<T, BotError>;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("No images found for: {query}")]
    NoImageFound { query: String },

    #[error("Bluesky authentication error: {0}")]
    AuthFailure(String),

    #[error("Bluesky image upload error: {0}")]
    UploadFailure(String),

    #[error("Bluesky post error: {0}")]
    PostFailure(String),

    #[error(
        "Unable to compress image under {ceiling} bytes \
         (last attempt {last_size} bytes at quality {last_quality})"
    )]
    CompressionFailure {
        ceiling: usize,
        last_size: usize,
        last_quality: u8,
    },

    #[error("Failed to fetch image {url}: {message}")]
    ImageFetch { url: String, message: String },

    #[error("Image processing error: {0}")]
    Image(String),

    #[error("No sites available to post")]
    NoSites,

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Image search error: {0}")]
    Search(#[from] SearchError),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<image::ImageError> for BotError {
    fn from(err: image::ImageError) -> Self {
        BotError::Image(err.to_string())
    }
}
