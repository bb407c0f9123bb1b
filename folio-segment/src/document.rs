//! Data types for source documents and the segments produced from them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Placeholder author for documents without catalog metadata.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Placeholder publication year for documents without catalog metadata.
pub const DEFAULT_YEAR: i32 = 2020;

fn default_author() -> String {
    UNKNOWN_AUTHOR.to_string()
}

fn default_year() -> i32 {
    DEFAULT_YEAR
}

/// Document-level metadata supplied by the caller.
///
/// Missing fields fall back to placeholders so that one incomplete record
/// never aborts a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default = "default_year")]
    pub year: i32,
    /// Free-form labels copied verbatim onto every segment.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Document-level topics; the first one is the fallback for unclassified segments.
    #[serde(default)]
    pub primary_topics: Vec<String>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            author: default_author(),
            year: default_year(),
            tags: Vec::new(),
            primary_topics: Vec::new(),
        }
    }
}

impl DocumentMetadata {
    /// Create metadata with an id and title and placeholder values elsewhere.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), ..Self::default() }
    }

    /// The topic to use when a segment matched no taxonomy keyword.
    pub fn fallback_topic(&self) -> Option<&str> {
        self.primary_topics.first().map(String::as_str)
    }
}

/// Coarse classification of a segment by code density.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Prose,
    Example,
    Code,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Prose => "prose",
            ContentType::Example => "example",
            ContentType::Code => "code",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to every segment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentMetadata {
    pub source_id: String,
    pub source_title: String,
    pub author: String,
    pub year: i32,
    /// Governing chapter heading, empty if none was found.
    pub chapter: String,
    /// Section heading at the top of the segment, empty if none was found.
    pub section: String,
    /// First page covered, 0 when no page map was supplied.
    pub page_start: u32,
    /// Last page covered, 0 when no page map was supplied.
    pub page_end: u32,
    pub primary_topic: String,
    /// Further topics in descending score order, never containing `primary_topic`.
    pub secondary_topics: Vec<String>,
    pub content_type: ContentType,
    /// True if any code marker occurs, regardless of `content_type`.
    pub has_code: bool,
    pub tags: Vec<String>,
}

impl SegmentMetadata {
    /// Start segment metadata from the document-level fields.
    pub fn from_document(document: &DocumentMetadata) -> Self {
        Self {
            source_id: document.id.clone(),
            source_title: document.title.clone(),
            author: document.author.clone(),
            year: document.year,
            tags: document.tags.clone(),
            ..Self::default()
        }
    }

    /// Flatten into scalar values for stores that reject nested metadata.
    ///
    /// List fields are joined with `,`.
    pub fn to_flat_metadata(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("source_id".into(), Value::from(self.source_id.as_str()));
        map.insert("source_title".into(), Value::from(self.source_title.as_str()));
        map.insert("author".into(), Value::from(self.author.as_str()));
        map.insert("year".into(), Value::from(self.year));
        map.insert("chapter".into(), Value::from(self.chapter.as_str()));
        map.insert("section".into(), Value::from(self.section.as_str()));
        map.insert("page_start".into(), Value::from(self.page_start));
        map.insert("page_end".into(), Value::from(self.page_end));
        map.insert("primary_topic".into(), Value::from(self.primary_topic.as_str()));
        map.insert("secondary_topics".into(), Value::from(self.secondary_topics.join(",")));
        map.insert("content_type".into(), Value::from(self.content_type.as_str()));
        map.insert("has_code".into(), Value::from(self.has_code));
        map.insert("tags".into(), Value::from(self.tags.join(",")));
        map
    }
}

/// A retrievable unit of document text with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Segment {
    /// Deterministic id, see [`segment_id`].
    pub id: String,
    pub content: String,
    pub metadata: SegmentMetadata,
}

impl Segment {
    /// Create a segment, deriving its id from the source id and content.
    pub fn new(content: String, metadata: SegmentMetadata) -> Self {
        let id = segment_id(&metadata.source_id, &content);
        Self { id, content, metadata }
    }
}

/// Derive `{source_id}_{hash}` where `hash` is the first 16 hex digits of the
/// SHA-256 of `content`. Identical content from the same source always maps to
/// the same id, which makes re-indexing idempotent.
pub fn segment_id(source_id: &str, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    format!("{source_id}_{}", &hash[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_id_is_deterministic() {
        let a = segment_id("book", "Some content");
        let b = segment_id("book", "Some content");
        assert_eq!(a, b);
        assert!(a.starts_with("book_"));
        assert_eq!(a.len(), "book_".len() + 16);
    }

    #[test]
    fn segment_id_depends_on_source_and_content() {
        assert_ne!(segment_id("a", "text"), segment_id("b", "text"));
        assert_ne!(segment_id("a", "text"), segment_id("a", "text!"));
    }

    #[test]
    fn metadata_defaults_fill_missing_fields() {
        let meta: DocumentMetadata = serde_json::from_str(r#"{"id": "b1", "title": "Book"}"#).unwrap();
        assert_eq!(meta.author, "Unknown");
        assert_eq!(meta.year, 2020);
        assert!(meta.tags.is_empty());
        assert_eq!(meta.fallback_topic(), None);
    }

    #[test]
    fn segment_metadata_copies_document_fields() {
        let mut doc = DocumentMetadata::new("b1", "Color Basics");
        doc.tags = vec!["color".into(), "beginner".into()];
        let meta = SegmentMetadata::from_document(&doc);

        assert_eq!(meta.source_id, "b1");
        assert_eq!(meta.source_title, "Color Basics");
        assert_eq!(meta.tags, doc.tags);
        assert_eq!(meta.page_start, 0);
        assert_eq!(meta.content_type, ContentType::Prose);
    }

    #[test]
    fn flat_metadata_has_only_scalars() {
        let meta = SegmentMetadata {
            source_id: "b1".into(),
            year: 2019,
            page_start: 3,
            page_end: 4,
            primary_topic: "color_theory".into(),
            secondary_topics: vec!["layout".into(), "typography".into()],
            content_type: ContentType::Example,
            has_code: true,
            tags: vec!["css".into()],
            ..SegmentMetadata::default()
        };
        let flat = meta.to_flat_metadata();

        assert_eq!(flat.len(), 13);
        assert!(flat.values().all(|v| !v.is_array() && !v.is_object()));
        assert_eq!(flat["secondary_topics"], "layout,typography");
        assert_eq!(flat["content_type"], "example");
        assert_eq!(flat["has_code"], true);
        assert_eq!(flat["year"], 2019);
        assert_eq!(flat["page_end"], 4);
        assert_eq!(flat["tags"], "css");
    }

    #[test]
    fn content_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ContentType::Code).unwrap(), "\"code\"");
        assert_eq!(ContentType::Prose.to_string(), "prose");
    }
}
