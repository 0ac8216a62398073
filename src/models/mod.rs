use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Metadata Models
// ============================================================================

/// Preview metadata for a saved link.
///
/// Every field except `tags` is optional: a page may expose nothing but a
/// title. `image_url` is always absolute when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl MetadataResult {
    /// True when there is nothing worth showing in the link form.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
            && self.tags.is_empty()
    }
}

// ============================================================================
// Source Models
// ============================================================================

/// How the service sees a URL before fetching anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SourceInfo {
    pub hostname: String,
    pub brand: String,
    pub strategy: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_camel_case_and_omits_missing_fields() {
        let result = MetadataResult {
            title: Some("Foo".into()),
            image_url: Some("https://example.com/x.png".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({ "title": "Foo", "imageUrl": "https://example.com/x.png", "tags": [] })
        );
    }

    #[test]
    fn deserializes_without_tags() {
        let result: MetadataResult = serde_json::from_value(json!({ "title": "Foo" })).unwrap();
        assert_eq!(result.title.as_deref(), Some("Foo"));
        assert!(result.tags.is_empty());
    }

    #[test]
    fn empty_result_is_empty() {
        assert!(MetadataResult::default().is_empty());
        let tagged = MetadataResult {
            tags: vec!["wsj".into()],
            ..Default::default()
        };
        assert!(!tagged.is_empty());
    }
}
