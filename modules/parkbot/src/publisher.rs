use std::sync::Arc;

use async_trait::async_trait;
use bluesky_client::{Blob, BlueskyClient, BlueskyError, EmbeddedImage, PostRecord, RecordRef};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::compress::CompressedImage;
use crate::error::{BotError, Result};
use crate::traits::SocialNetwork;
use crate::types::{ImageCandidate, SessionToken, Site};

/// Post text: site name and location on separate lines, untruncated.
pub fn caption(site: &Site) -> String {
    format!("{}\n{}", site.name, site.location)
}

pub fn build_post(
    site: &Site,
    candidate: &ImageCandidate,
    blob: Blob,
    created_at: DateTime<Utc>,
) -> PostRecord {
    PostRecord::new(caption(site), created_at).with_images(vec![EmbeddedImage {
        image: blob,
        alt: candidate.description.clone(),
    }])
}

/// Authenticate, upload, post. Each stage blocks on the previous one and any
/// failure aborts the rest. A blob uploaded before a failed post is left behind.
pub struct Publisher {
    network: Arc<dyn SocialNetwork>,
}

impl Publisher {
    pub fn new(network: Arc<dyn SocialNetwork>) -> Self {
        Self { network }
    }

    pub async fn publish(
        &self,
        site: &Site,
        candidate: &ImageCandidate,
        image: CompressedImage,
    ) -> Result<RecordRef> {
        let token = self.network.authenticate().await?;

        let size = image.len();
        let blob = self.network.upload_blob(&token, image).await?;
        info!(size, cid = %blob.cid.link, "Uploaded image blob");

        let post = build_post(site, candidate, blob, Utc::now());
        let record = self.network.create_post(&token, &post).await?;

        info!(uri = %record.uri, "Post successful!");
        Ok(record)
    }
}

/// [`SocialNetwork`] over the Bluesky XRPC API, posting as one fixed account.
pub struct BlueskyNetwork {
    client: BlueskyClient,
    handle: String,
    password: String,
}

impl BlueskyNetwork {
    pub fn new(client: BlueskyClient, handle: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            client,
            handle: handle.into(),
            password: password.into(),
        }
    }
}

/// Prefer the server's own error text over our wrapper.
fn describe(err: BlueskyError) -> String {
    match err {
        BlueskyError::Api { message, .. } => message,
        other => other.to_string(),
    }
}

#[async_trait]
impl SocialNetwork for BlueskyNetwork {
    async fn authenticate(&self) -> Result<SessionToken> {
        let session = self
            .client
            .create_session(&self.handle, &self.password)
            .await
            .map_err(|e| BotError::AuthFailure(describe(e)))?;
        Ok(SessionToken::new(session.access_jwt))
    }

    async fn upload_blob(&self, token: &SessionToken, image: CompressedImage) -> Result<Blob> {
        let mime_type = image.mime_type();
        self.client
            .upload_blob(token.as_str(), image.into_bytes(), mime_type)
            .await
            .map_err(|e| BotError::UploadFailure(describe(e)))
    }

    async fn create_post(&self, token: &SessionToken, post: &PostRecord) -> Result<RecordRef> {
        self.client
            .create_post(token.as_str(), &self.handle, post)
            .await
            .map_err(|e| BotError::PostFailure(describe(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluesky_client::CidLink;
    use chrono::TimeZone;

    #[test]
    fn caption_is_name_newline_location() {
        let site = Site::new(
            "Wrangell-St. Elias National Park & Preserve, the largest unit in the system",
            "Copper Center, AK",
        );
        assert_eq!(
            caption(&site),
            "Wrangell-St. Elias National Park & Preserve, the largest unit in the system\nCopper Center, AK"
        );
    }

    #[test]
    fn post_embeds_blob_with_alt_text() {
        let site = Site::new("Acadia National Park", "Bar Harbor, ME");
        let candidate = ImageCandidate {
            image_url: "https://img.example.com/acadia.jpg".to_string(),
            description: "Sunrise over Cadillac Mountain".to_string(),
        };
        let blob = Blob {
            blob_type: "blob".to_string(),
            cid: CidLink {
                link: "bafkreiacadia".to_string(),
            },
            mime_type: "image/jpeg".to_string(),
            size: 512_000,
        };
        let created_at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        let post = build_post(&site, &candidate, blob.clone(), created_at);

        assert_eq!(post.text, "Acadia National Park\nBar Harbor, ME");
        assert_eq!(post.created_at, "2025-01-02T03:04:05.000Z");
        let embed = post.embed.unwrap();
        assert_eq!(embed.images.len(), 1);
        assert_eq!(embed.images[0].image, blob);
        assert_eq!(embed.images[0].alt, "Sunrise over Cadillac Mountain");
    }
}
