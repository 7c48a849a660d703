use thiserror::Error;

pub type Result<T> = std::result::Result<T, BlueskyError>;

#[derive(Debug, Error)]
pub enum BlueskyError {
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx XRPC response. `error` is the structured error name when the server sent one.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        error: Option<String>,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for BlueskyError {
    fn from(err: reqwest::Error) -> Self {
        BlueskyError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for BlueskyError {
    fn from(err: serde_json::Error) -> Self {
        BlueskyError::Parse(err.to_string())
    }
}
