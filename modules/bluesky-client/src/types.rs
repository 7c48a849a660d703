use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Collection NSID for feed posts.
pub const POST_COLLECTION: &str = "app.bsky.feed.post";

/// `$type` for an images embed on a post.
pub const IMAGES_EMBED_TYPE: &str = "app.bsky.embed.images";

// --- com.atproto.server.createSession ---

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionInput<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
}

/// An authenticated session. `access_jwt` is the bearer token for subsequent calls.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(rename = "accessJwt")]
    pub access_jwt: String,
    #[serde(rename = "refreshJwt", default)]
    pub refresh_jwt: String,
    #[serde(default)]
    pub did: String,
    #[serde(default)]
    pub handle: String,
}

// --- com.atproto.repo.uploadBlob ---

#[derive(Debug, Clone, Deserialize)]
pub struct UploadBlobOutput {
    pub blob: Blob,
}

/// Reference to an uploaded blob. Embedded verbatim in records that use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    #[serde(rename = "$type", default = "blob_type")]
    pub blob_type: String,
    #[serde(rename = "ref")]
    pub cid: CidLink,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CidLink {
    #[serde(rename = "$link")]
    pub link: String,
}

fn blob_type() -> String {
    "blob".to_string()
}

// --- com.atproto.repo.createRecord ---

#[derive(Debug, Clone, Serialize)]
pub struct CreateRecordInput<'a, R: Serialize> {
    pub repo: &'a str,
    pub collection: &'a str,
    pub record: &'a R,
}

/// Location of a newly created record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordRef {
    pub uri: String,
    pub cid: String,
}

// --- app.bsky.feed.post ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(rename = "$type")]
    pub record_type: String,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub embed: Option<ImagesEmbed>,
}

impl PostRecord {
    pub fn new(text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            record_type: POST_COLLECTION.to_string(),
            text: text.into(),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            embed: None,
        }
    }

    pub fn with_images(mut self, images: Vec<EmbeddedImage>) -> Self {
        self.embed = Some(ImagesEmbed {
            embed_type: IMAGES_EMBED_TYPE.to_string(),
            images,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesEmbed {
    #[serde(rename = "$type")]
    pub embed_type: String,
    pub images: Vec<EmbeddedImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedImage {
    pub image: Blob,
    pub alt: String,
}

// --- Errors ---

/// Body of a non-2xx XRPC response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct XrpcErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
