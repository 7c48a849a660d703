pub mod error;
pub mod types;

pub use error::{BlueskyError, Result};
pub use types::{
    Blob, CidLink, EmbeddedImage, ImagesEmbed, PostRecord, RecordRef, Session, POST_COLLECTION,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use types::{CreateRecordInput, CreateSessionInput, UploadBlobOutput, XrpcErrorBody};

const BASE_URL: &str = "https://bsky.social";

pub struct BlueskyClient {
    client: reqwest::Client,
    base_url: String,
}

impl BlueskyClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn xrpc_url(&self, method: &str) -> String {
        format!("{}/xrpc/{}", self.base_url, method)
    }

    /// Exchange a handle (or email) and password for a session.
    pub async fn create_session(&self, identifier: &str, password: &str) -> Result<Session> {
        let resp = self
            .client
            .post(self.xrpc_url("com.atproto.server.createSession"))
            .json(&CreateSessionInput {
                identifier,
                password,
            })
            .send()
            .await?;

        let session: Session = read_output(resp).await?;
        tracing::debug!(did = %session.did, handle = %session.handle, "Session created");
        Ok(session)
    }

    /// Upload raw bytes as a blob. The returned [`Blob`] is what records embed.
    pub async fn upload_blob(
        &self,
        access_jwt: &str,
        bytes: Vec<u8>,
        mime_type: &str,
    ) -> Result<Blob> {
        let size = bytes.len();
        let resp = self
            .client
            .post(self.xrpc_url("com.atproto.repo.uploadBlob"))
            .bearer_auth(access_jwt)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await?;

        let output: UploadBlobOutput = read_output(resp).await?;
        tracing::debug!(size, cid = %output.blob.cid.link, "Blob uploaded");
        Ok(output.blob)
    }

    /// Create a record in `repo`'s `collection`.
    pub async fn create_record<R: Serialize>(
        &self,
        access_jwt: &str,
        repo: &str,
        collection: &str,
        record: &R,
    ) -> Result<RecordRef> {
        let resp = self
            .client
            .post(self.xrpc_url("com.atproto.repo.createRecord"))
            .bearer_auth(access_jwt)
            .json(&CreateRecordInput {
                repo,
                collection,
                record,
            })
            .send()
            .await?;

        read_output(resp).await
    }

    /// Publish a feed post on behalf of `repo`.
    pub async fn create_post(
        &self,
        access_jwt: &str,
        repo: &str,
        post: &PostRecord,
    ) -> Result<RecordRef> {
        self.create_record(access_jwt, repo, POST_COLLECTION, post)
            .await
    }
}

impl Default for BlueskyClient {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_output<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let details: XrpcErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let reason = status.canonical_reason().unwrap_or("unknown").to_string();
        let message = match (&details.error, details.message) {
            (Some(error), Some(message)) => format!("{error}: {message}"),
            (Some(error), None) => error.clone(),
            (None, Some(message)) => message,
            (None, None) => reason,
        };
        return Err(BlueskyError::Api {
            status: status.as_u16(),
            error: details.error,
            message,
        });
    }

    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}
