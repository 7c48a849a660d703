// Test mocks for the posting cycle.
//
// One mock per trait seam:
// - MockImageSearch (ImageSearch): query → candidates, records every query
// - MockFetcher (ImageFetcher): url → bytes, Err for unregistered URLs
// - MockNetwork (SocialNetwork): records calls, fails a chosen stage on demand
// - RecordingSleeper (Sleeper): returns immediately, records durations
//
// Plus helpers for building a PostingBot around them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bluesky_client::{Blob, CidLink, PostRecord, RecordRef};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bot::PostingBot;
use crate::compress::{CompressedImage, ImageCompressor};
use crate::error::{BotError, Result};
use crate::publisher::Publisher;
use crate::resolver::ImageResolver;
use crate::selector::SiteLists;
use crate::traits::{ImageFetcher, ImageSearch, Sleeper, SocialNetwork};
use crate::types::{ImageCandidate, SessionToken, Site};

// ---------------------------------------------------------------------------
// MockImageSearch
// ---------------------------------------------------------------------------

/// Returns registered candidates per query, or an empty list.
#[derive(Default)]
pub struct MockImageSearch {
    results: HashMap<String, Vec<ImageCandidate>>,
    fallback: Vec<ImageCandidate>,
    queries: Mutex<Vec<String>>,
}

impl MockImageSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_query(mut self, query: &str, candidates: Vec<ImageCandidate>) -> Self {
        self.results.insert(query.to_string(), candidates);
        self
    }

    /// Candidates returned for any query without its own entry.
    pub fn on_any(mut self, candidates: Vec<ImageCandidate>) -> Self {
        self.fallback = candidates;
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSearch for MockImageSearch {
    async fn search(&self, query: &str) -> Result<Vec<ImageCandidate>> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self
            .results
            .get(query)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockFetcher {
    images: HashMap<String, Vec<u8>>,
    fetched: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_url(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.images.insert(url.to_string(), bytes);
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| BotError::ImageFetch {
                url: url.to_string(),
                message: "status 404 Not Found".to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// MockNetwork
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkCall {
    Authenticate,
    UploadBlob { size: usize, mime_type: String },
    CreatePost { token: String, post: PostRecord },
}

/// Records every call in order. Each stage can be made to fail starting from its Nth call
/// (1-based), so a scheduler can run a few clean cycles before breaking.
#[derive(Default)]
pub struct MockNetwork {
    calls: Mutex<Vec<NetworkCall>>,
    auth_count: AtomicUsize,
    fail_auth_from: Option<usize>,
    fail_upload: Option<String>,
    fail_post: Option<String>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_auth(self) -> Self {
        self.fail_auth_from(1)
    }

    pub fn fail_auth_from(mut self, call: usize) -> Self {
        self.fail_auth_from = Some(call);
        self
    }

    pub fn fail_upload(mut self, message: &str) -> Self {
        self.fail_upload = Some(message.to_string());
        self
    }

    pub fn fail_post(mut self, message: &str) -> Self {
        self.fail_post = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<NetworkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<PostRecord> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                NetworkCall::CreatePost { post, .. } => Some(post),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: NetworkCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SocialNetwork for MockNetwork {
    async fn authenticate(&self) -> Result<SessionToken> {
        self.record(NetworkCall::Authenticate);
        let n = self.auth_count.fetch_add(1, Ordering::SeqCst) + 1;
        match self.fail_auth_from {
            Some(from) if n >= from => Err(BotError::AuthFailure("Unauthorized".to_string())),
            _ => Ok(SessionToken::new(format!("token-{n}"))),
        }
    }

    async fn upload_blob(&self, _token: &SessionToken, image: CompressedImage) -> Result<Blob> {
        self.record(NetworkCall::UploadBlob {
            size: image.len(),
            mime_type: image.mime_type().to_string(),
        });
        if let Some(message) = &self.fail_upload {
            return Err(BotError::UploadFailure(message.clone()));
        }
        Ok(test_blob(image.mime_type(), image.len() as u64))
    }

    async fn create_post(&self, token: &SessionToken, post: &PostRecord) -> Result<RecordRef> {
        self.record(NetworkCall::CreatePost {
            token: token.as_str().to_string(),
            post: post.clone(),
        });
        if let Some(message) = &self.fail_post {
            return Err(BotError::PostFailure(message.clone()));
        }
        let n = self.posts().len();
        Ok(RecordRef {
            uri: format!("at://did:plc:test/app.bsky.feed.post/{n}"),
            cid: format!("bafyreipost{n}"),
        })
    }
}

// ---------------------------------------------------------------------------
// RecordingSleeper
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn test_blob(mime_type: &str, size: u64) -> Blob {
    Blob {
        blob_type: "blob".to_string(),
        cid: CidLink {
            link: "bafkreitestblob".to_string(),
        },
        mime_type: mime_type.to_string(),
        size,
    }
}

pub fn candidate(url: &str, description: &str) -> ImageCandidate {
    ImageCandidate {
        image_url: url.to_string(),
        description: description.to_string(),
    }
}

/// A bot over the given mocks with a fixed RNG seed and default compression.
pub fn mock_bot(
    sites: SiteLists,
    search: Arc<MockImageSearch>,
    fetcher: Arc<MockFetcher>,
    network: Arc<MockNetwork>,
) -> PostingBot {
    PostingBot::new(
        sites,
        StdRng::seed_from_u64(17),
        ImageResolver::new(search),
        fetcher,
        ImageCompressor::default(),
        Publisher::new(network),
    )
}

/// A one-site list, so selection is deterministic.
pub fn single_site(name: &str, location: &str) -> SiteLists {
    SiteLists::new(vec![Site::new(name, location)], Vec::new())
}
