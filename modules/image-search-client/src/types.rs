use serde::Deserialize;

/// Envelope returned by `/images/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub value: Vec<ImageResult>,
}

/// A single image hit. Only the fields the bot reads are modelled.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageResult {
    #[serde(rename = "contentUrl")]
    pub content_url: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "thumbnailUrl", default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}
