pub mod error;
pub mod nps;
pub mod ridb;
pub mod types;

pub use error::{RegistryError, Result};
pub use nps::NpsClient;
pub use ridb::RidbClient;
pub use types::{Site, SITE_EXCLUSIONS, UNKNOWN_CITY, UNKNOWN_STATE};

use serde::de::DeserializeOwned;

/// Records requested per page from either registry.
pub const PAGE_SIZE: u64 = 50;

/// Read a response body, turning non-2xx statuses into `RegistryError::Api`.
async fn read_page<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or("unknown").to_string()
        } else {
            body
        };
        return Err(RegistryError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}
