//! Content descriptor shapes.
//!
//! Descriptors are loosely-typed JSON documents authored next to the media
//! they describe. Every field is optional unless the renderer cannot work
//! without it, and absence is always distinguished from an empty value.

use indexmap::IndexMap;
use serde::Deserialize;

/// A single renderable project (or sub-folder) descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectContent {
    /// Primary thumbnail image, relative to the content base.
    #[serde(rename = "Image")]
    pub image: Option<String>,
    /// Additional second thumbnail, image-only.
    #[serde(rename = "image 2")]
    pub image_2: Option<String>,
    /// Inline video, relative to the content base unless an absolute URL.
    #[serde(rename = "Video")]
    pub video: Option<String>,
    #[serde(rename = "Pdf")]
    pub pdf: Option<String>,
    #[serde(rename = "Link")]
    pub link: Option<String>,
    /// Display label override.
    #[serde(rename = "Text")]
    pub text: Option<String>,
    /// Free text in the private description markup.
    #[serde(rename = "Description")]
    pub description: Option<String>,
    /// Ordered sub-project identifiers, each with its own nested descriptor.
    pub subfolders: Option<Vec<String>>,
    #[serde(rename = "CustomerWorkshops")]
    pub customer_workshops: Option<Vec<Workshop>>,
}

impl ProjectContent {
    /// Sub-folder identifiers, empty when the field is absent.
    pub fn subfolders(&self) -> &[String] {
        self.subfolders.as_deref().unwrap_or_default()
    }
}

/// One entry of the multi-choice workshop card.
#[derive(Debug, Clone, Deserialize)]
pub struct Workshop {
    pub title: String,
    pub topics: Vec<String>,
}

/// The top-level gallery listing.
///
/// A missing or non-sequence `projects` field makes the whole index
/// structurally invalid, which the orchestrator surfaces as a single
/// user-visible message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectIndex {
    pub projects: Option<Vec<String>>,
}

/// One journey timeline event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    /// Calendar month 1–12; absent means the date is only known to the year.
    #[serde(rename = "Month")]
    pub month: Option<u32>,
    #[serde(rename = "Image")]
    pub image: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    /// Style tag for the event card, `"default"` when absent.
    #[serde(rename = "CardStyle")]
    pub card_style: Option<String>,
}

/// The journey document: arbitrary event identifiers mapped to records,
/// in document order.
pub type Journey = IndexMap<String, EventRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_content_field_names() {
        let json = r#"{
            "Image": "cover.webp",
            "image 2": "detail.webp",
            "Video": "https://example.com/v.mp4",
            "Description": "**bold**",
            "subfolders": ["a", "b"],
            "CustomerWorkshops": [{ "title": "Intro", "topics": ["x", "y"] }]
        }"#;
        let content: ProjectContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.image.as_deref(), Some("cover.webp"));
        assert_eq!(content.image_2.as_deref(), Some("detail.webp"));
        assert_eq!(content.subfolders(), ["a", "b"]);
        assert_eq!(content.customer_workshops.unwrap()[0].topics, ["x", "y"]);
        assert!(content.pdf.is_none());
    }

    #[test]
    fn test_empty_descriptor_is_valid() {
        let content: ProjectContent = serde_json::from_str("{}").unwrap();
        assert!(content.image.is_none());
        assert!(content.subfolders().is_empty());
    }

    #[test]
    fn test_unknown_fields_are_tolerated() {
        let content: ProjectContent =
            serde_json::from_str(r#"{ "Whatever": 42, "Image": "a.png" }"#).unwrap();
        assert_eq!(content.image.as_deref(), Some("a.png"));
    }

    #[test]
    fn test_index_with_wrong_shape() {
        let index: ProjectIndex = serde_json::from_str("{}").unwrap();
        assert!(index.projects.is_none());

        let bad: Result<ProjectIndex, _> = serde_json::from_str(r#"{ "projects": "nope" }"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_journey_preserves_document_order() {
        let json = r#"{
            "second": { "Year": 2020 },
            "first": { "Year": 2019, "Month": 3 }
        }"#;
        let journey: Journey = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = journey.keys().collect();
        assert_eq!(keys, ["second", "first"]);
        assert_eq!(journey["first"].month, Some(3));
    }
}
