//! Liveness responder. Shares no state with the posting loop.

use std::net::SocketAddr;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Router;
use tokio::net::TcpListener;

pub const LIVENESS_BODY: &str = "Bot is running.\n";

/// Every method and path gets the same 200.
pub fn router() -> Router {
    Router::new().fallback(liveness)
}

async fn liveness() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        LIVENESS_BODY,
    )
}

pub async fn bind(port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await
}

pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    axum::serve(listener, router()).await
}
