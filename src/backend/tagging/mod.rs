//! AI tag suggestion collaborator
//!
//! Given an uploaded image, an external vision model suggests the item's
//! category, color, style tags and an estimated secondhand price. The core
//! only consumes the resulting fields and is agnostic to how they were
//! produced. A tagging failure is surfaced to the caller, who falls back to
//! manual entry; it never fails the upload.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaggingError {
    #[error("tagging request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("tagging response malformed: {0}")]
    Malformed(String),
}

/// Suggested fields for an uploaded item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagSuggestion {
    pub category: String,
    pub color: String,
    #[serde(rename = "style_tags")]
    pub style_tags: Vec<String>,
    pub estimated_price: i64,
}

#[async_trait]
pub trait ItemTagger: Send + Sync {
    /// Analyze an image (base64 payload plus its mime type) and suggest
    /// item fields.
    async fn suggest_tags(
        &self,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<TagSuggestion, TaggingError>;
}

/// HTTP-backed tagger posting the image to a configured vision endpoint.
pub struct HttpTagger {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTagger {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self { client: reqwest::Client::new(), endpoint, api_key }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TagRequestBody<'a> {
    image: &'a str,
    mime_type: &'a str,
}

#[async_trait]
impl ItemTagger for HttpTagger {
    async fn suggest_tags(
        &self,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<TagSuggestion, TaggingError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&TagRequestBody { image: image_base64, mime_type });
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?.error_for_status()?;
        let suggestion: TagSuggestion = response
            .json()
            .await
            .map_err(|e| TaggingError::Malformed(e.to_string()))?;

        if suggestion.category.is_empty() {
            return Err(TaggingError::Malformed("empty category".to_string()));
        }
        Ok(suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_parses_document_field_names() {
        let json = r#"{
            "category": "連身裙",
            "color": "黃色",
            "style_tags": ["復古風", "波西米亞風"],
            "estimatedPrice": 800
        }"#;
        let suggestion: TagSuggestion = serde_json::from_str(json).unwrap();
        assert_eq!(suggestion.category, "連身裙");
        assert_eq!(suggestion.style_tags.len(), 2);
        assert_eq!(suggestion.estimated_price, 800);
    }
}
