//! Production adapters (Bluesky, image fetch, image search) against wiremock servers.

use std::sync::Arc;

use bluesky_client::BlueskyClient;
use image_search_client::ImageSearchClient;
use parkbot::fetch::HttpImageFetcher;
use parkbot::testing::candidate;
use parkbot::traits::{ImageFetcher, ImageSearch};
use parkbot::{BlueskyNetwork, BotError, CompressedImage, ImageResolver, Publisher, Site};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HANDLE: &str = "npsunitshourly.bsky.social";

fn publisher_for(server: &MockServer) -> Publisher {
    let network = BlueskyNetwork::new(
        BlueskyClient::with_base_url(&server.uri()),
        HANDLE,
        "app-password",
    );
    Publisher::new(Arc::new(network))
}

async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessJwt": "access-token",
            "refreshJwt": "refresh-token",
            "did": "did:plc:parks",
            "handle": HANDLE
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn rejected_login_is_auth_failure_and_nothing_else_is_called() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "AuthenticationRequired",
            "message": "Invalid identifier or password"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let site = Site::new("Zion National Park", "Springdale, UT");
    let err = publisher_for(&server)
        .publish(
            &site,
            &candidate("https://img.example.com/zion.jpg", "Zion"),
            CompressedImage::jpeg(vec![0xFF, 0xD8, 0xFF, 0xD9]),
        )
        .await
        .unwrap_err();

    match err {
        BotError::AuthFailure(message) => {
            assert_eq!(message, "AuthenticationRequired: Invalid identifier or password")
        }
        other => panic!("expected AuthFailure, got {other:?}"),
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn publish_runs_all_three_calls() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.repo.uploadBlob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "blob": {
                "$type": "blob",
                "ref": { "$link": "bafkreizion" },
                "mimeType": "image/jpeg",
                "size": 4
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.repo.createRecord"))
        .and(body_partial_json(json!({
            "repo": HANDLE,
            "collection": "app.bsky.feed.post",
            "record": { "text": "Zion National Park\nSpringdale, UT" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uri": "at://did:plc:parks/app.bsky.feed.post/3zion",
            "cid": "bafyreizionpost"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let site = Site::new("Zion National Park", "Springdale, UT");
    let record = publisher_for(&server)
        .publish(
            &site,
            &candidate("https://img.example.com/zion.jpg", "Angels Landing"),
            CompressedImage::jpeg(vec![0xFF, 0xD8, 0xFF, 0xD9]),
        )
        .await
        .unwrap();

    assert_eq!(record.uri, "at://did:plc:parks/app.bsky.feed.post/3zion");
}

#[tokio::test]
async fn failed_post_is_post_failure() {
    let server = MockServer::start().await;
    mount_session(&server).await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.repo.uploadBlob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "blob": {
                "$type": "blob",
                "ref": { "$link": "bafkreizion" },
                "mimeType": "image/jpeg",
                "size": 4
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.repo.createRecord"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "InvalidRequest"
        })))
        .mount(&server)
        .await;

    let site = Site::new("Zion National Park", "Springdale, UT");
    let err = publisher_for(&server)
        .publish(
            &site,
            &candidate("https://img.example.com/zion.jpg", "Zion"),
            CompressedImage::jpeg(vec![1, 2, 3]),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BotError::PostFailure(ref m) if m == "InvalidRequest"), "got {err:?}");
}

#[tokio::test]
async fn image_fetch_non_success_is_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing.jpg", server.uri());
    let err = HttpImageFetcher::new().fetch(&url).await.unwrap_err();

    match err {
        BotError::ImageFetch { url: failed, message } => {
            assert_eq!(failed, url);
            assert!(message.contains("404"), "message: {message}");
        }
        other => panic!("expected ImageFetch, got {other:?}"),
    }
}

#[tokio::test]
async fn image_fetch_returns_body_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/photo.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9u8, 8, 7]))
        .mount(&server)
        .await;

    let bytes = HttpImageFetcher::new()
        .fetch(&format!("{}/photo.jpg", server.uri()))
        .await
        .unwrap();
    assert_eq!(bytes, vec![9, 8, 7]);
}

#[tokio::test]
async fn resolver_over_search_client_takes_first_hit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                { "contentUrl": "https://img.example.com/first.jpg", "name": "First" },
                { "contentUrl": "https://img.example.com/second.jpg", "name": "Second" }
            ]
        })))
        .mount(&server)
        .await;

    let search: Arc<dyn ImageSearch> =
        Arc::new(ImageSearchClient::with_base_url(&server.uri(), "bing-key"));
    let resolver = ImageResolver::new(search);
    let site = Site::new("Acadia National Park", "Bar Harbor, ME");

    let found = resolver.resolve(&site).await.unwrap();
    assert_eq!(found, candidate("https://img.example.com/first.jpg", "First"));
}

#[tokio::test]
async fn resolver_reports_no_image_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .mount(&server)
        .await;

    let resolver = ImageResolver::new(Arc::new(ImageSearchClient::with_base_url(
        &server.uri(),
        "bing-key",
    )));
    let site = Site::new("Acadia National Park", "Bar Harbor, ME");

    let err = resolver.resolve(&site).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "No images found for: Acadia National Park Bar Harbor, ME"
    );
}
