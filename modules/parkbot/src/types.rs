use std::fmt;

pub use registry_client::Site;

/// The first image-search hit for a site, consumed by one posting cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub image_url: String,
    /// Used as the post's alt text.
    pub description: String,
}

/// Bearer credential for one posting cycle. Never cached across cycles.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(<{} chars>)", self.0.len())
    }
}
