//! Document processing: split → enrich → classify.
//!
//! [`DocumentProcessor`] turns the full text of one document into [`Segment`]s.
//! It performs no I/O and holds no mutable state, so one processor can be
//! shared across worker threads.

use std::sync::Arc;

use folio_topic::TopicClassifier;
use tracing::debug;

use crate::config::SegmentConfig;
use crate::document::{DocumentMetadata, Segment, SegmentMetadata};
use crate::enrich::SegmentEnricher;
use crate::error::{Result, SegmentError};
use crate::page::PageBreakMap;
use crate::splitter::ChunkSplitter;

/// Segments documents with a fixed splitter, enricher and classifier.
///
/// Construct one via [`DocumentProcessor::builder()`] or
/// [`DocumentProcessor::new`].
#[derive(Debug, Clone)]
pub struct DocumentProcessor {
    splitter: ChunkSplitter,
    enricher: SegmentEnricher,
    classifier: Arc<TopicClassifier>,
}

impl DocumentProcessor {
    /// Create a processor from a validated configuration.
    pub fn new(config: &SegmentConfig, classifier: Arc<TopicClassifier>) -> Result<Self> {
        Ok(Self {
            splitter: ChunkSplitter::new(config.chunker.clone())?,
            enricher: SegmentEnricher::new(config.enricher.clone())?,
            classifier,
        })
    }

    /// Create a new builder for constructing a [`DocumentProcessor`].
    pub fn builder() -> DocumentProcessorBuilder {
        DocumentProcessorBuilder::default()
    }

    pub fn splitter(&self) -> &ChunkSplitter {
        &self.splitter
    }

    pub fn enricher(&self) -> &SegmentEnricher {
        &self.enricher
    }

    pub fn classifier(&self) -> &Arc<TopicClassifier> {
        &self.classifier
    }

    /// Segment `text`, the full text of the document described by `metadata`.
    ///
    /// Segments are returned in document order. When `page_breaks` is `None`
    /// every segment has `page_start == page_end == 0`.
    pub fn process(
        &self,
        text: &str,
        metadata: &DocumentMetadata,
        page_breaks: Option<&PageBreakMap>,
    ) -> Vec<Segment> {
        segment_document(&self.splitter, &self.enricher, &self.classifier, text, metadata, page_breaks)
    }
}

/// Segment a document with the default splitter and enricher.
///
/// A segment that matches no taxonomy keyword takes the document's first
/// primary topic, when it has one.
pub fn process_document(
    text: &str,
    metadata: &DocumentMetadata,
    page_breaks: Option<&PageBreakMap>,
    classifier: &TopicClassifier,
) -> Vec<Segment> {
    segment_document(
        &ChunkSplitter::default(),
        &SegmentEnricher::default(),
        classifier,
        text,
        metadata,
        page_breaks,
    )
}

fn segment_document(
    splitter: &ChunkSplitter,
    enricher: &SegmentEnricher,
    classifier: &TopicClassifier,
    text: &str,
    metadata: &DocumentMetadata,
    page_breaks: Option<&PageBreakMap>,
) -> Vec<Segment> {
    let chunks = splitter.split(text);
    let mut fallbacks = 0usize;

    let segments: Vec<Segment> = chunks
        .into_iter()
        .map(|chunk| {
            let context = enricher.enrich(&chunk, text, page_breaks);
            let (primary, secondary) = classifier.classify(&chunk.text).into_parts();
            let primary_topic = if primary.is_empty() {
                fallbacks += 1;
                metadata.fallback_topic().unwrap_or_default().to_string()
            } else {
                primary
            };

            let segment_metadata = SegmentMetadata {
                chapter: context.chapter,
                section: context.section,
                page_start: context.page_start,
                page_end: context.page_end,
                primary_topic,
                secondary_topics: secondary,
                content_type: context.content_type,
                has_code: context.has_code,
                ..SegmentMetadata::from_document(metadata)
            };
            Segment::new(chunk.text, segment_metadata)
        })
        .collect();

    debug!(
        document.id = %metadata.id,
        segment_count = segments.len(),
        unclassified = fallbacks,
        "segmented document"
    );
    segments
}

/// Builder for constructing a [`DocumentProcessor`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use folio_segment::{DocumentMetadata, DocumentProcessor, SegmentConfig};
/// use folio_topic::{Taxonomy, TopicClassifier};
///
/// let taxonomy = Taxonomy::default().with_topic("color_theory", ["palette", "hue"]);
/// let processor = DocumentProcessor::builder()
///     .config(SegmentConfig::builder().target_size(200).max_size(400).min_size(10).overlap(20).build()?)
///     .classifier(Arc::new(TopicClassifier::new(&taxonomy)))
///     .build()?;
///
/// let meta = DocumentMetadata::new("book", "A Book");
/// let segments = processor.process("A palette is a set of hues chosen together.", &meta, None);
/// assert_eq!(segments[0].metadata.primary_topic, "color_theory");
/// # Ok::<(), folio_segment::SegmentError>(())
/// ```
#[derive(Debug, Default)]
pub struct DocumentProcessorBuilder {
    config: SegmentConfig,
    classifier: Option<Arc<TopicClassifier>>,
    enricher: Option<SegmentEnricher>,
}

impl DocumentProcessorBuilder {
    /// Set the segmentation configuration.
    pub fn config(mut self, config: SegmentConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the topic classifier (required).
    pub fn classifier(mut self, classifier: Arc<TopicClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Use a customised enricher instead of one built from the configuration.
    pub fn enricher(mut self, enricher: SegmentEnricher) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Build the [`DocumentProcessor`].
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::ConfigError`] if no classifier was set or the
    /// configuration is invalid.
    pub fn build(self) -> Result<DocumentProcessor> {
        let classifier = self
            .classifier
            .ok_or_else(|| SegmentError::ConfigError("classifier is required".to_string()))?;
        let mut processor = DocumentProcessor::new(&self.config, classifier)?;
        if let Some(enricher) = self.enricher {
            processor.enricher = enricher;
        }
        Ok(processor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContentType;
    use folio_topic::Taxonomy;

    fn classifier() -> Arc<TopicClassifier> {
        let taxonomy = Taxonomy::default()
            .with_topic("color_theory", ["palette", "hue", "contrast"])
            .with_topic("layout", ["grid", "column"]);
        Arc::new(TopicClassifier::new(&taxonomy))
    }

    fn small_processor() -> DocumentProcessor {
        let config = SegmentConfig::builder().target_size(120).max_size(200).min_size(20).overlap(0).build().unwrap();
        DocumentProcessor::new(&config, classifier()).unwrap()
    }

    #[test]
    fn builder_requires_classifier() {
        let err = DocumentProcessor::builder().build().unwrap_err();
        assert!(matches!(err, SegmentError::ConfigError(_)));
    }

    #[test]
    fn empty_text_has_no_segments() {
        let meta = DocumentMetadata::new("b", "Book");
        assert!(small_processor().process("   \n\n ", &meta, None).is_empty());
    }

    #[test]
    fn segments_carry_document_and_structural_metadata() {
        let text = "Chapter 1: Color\n\n\
                    Palette choices define the hue and contrast of a page.\n\n\
                    A grid with twelve columns keeps the layout aligned and calm.";
        let mut meta = DocumentMetadata::new("b1", "Web Color");
        meta.author = "Ada".into();
        meta.tags = vec!["web".into()];
        let pages: PageBreakMap = [(0, 1), (60, 2)].into_iter().collect();

        let segments = small_processor().process(text, &meta, Some(&pages));
        assert_eq!(segments.len(), 2);

        let first = &segments[0].metadata;
        assert_eq!(first.source_id, "b1");
        assert_eq!(first.author, "Ada");
        assert_eq!(first.tags, vec!["web".to_string()]);
        assert_eq!(first.primary_topic, "color_theory");
        assert_eq!(first.section, "Chapter 1: Color");
        assert_eq!(first.content_type, ContentType::Prose);
        assert_eq!(first.page_start, 1);

        let second = &segments[1].metadata;
        assert_eq!(second.chapter, "1 Color");
        assert_eq!(second.primary_topic, "layout");
        assert_eq!((second.page_start, second.page_end), (2, 2));
    }

    #[test]
    fn unmatched_segments_use_document_fallback() {
        let text = "Nothing in this sentence names any known keyword at all.";
        let mut meta = DocumentMetadata::new("b", "Book");
        meta.primary_topics = vec!["typography".into(), "layout".into()];

        let segments = process_document(text, &meta, None, &classifier());
        assert!(segments.is_empty(), "default min size drops short documents");

        let segments = small_processor().process(text, &meta, None);
        assert_eq!(segments[0].metadata.primary_topic, "typography");
        assert!(segments[0].metadata.secondary_topics.is_empty());

        let bare = DocumentMetadata::new("b", "Book");
        let segments = small_processor().process(text, &bare, None);
        assert_eq!(segments[0].metadata.primary_topic, "");
    }

    #[test]
    fn processing_is_deterministic() {
        let text = "The palette sets the hue. The grid sets the column rhythm.\n\nContrast matters.";
        let meta = DocumentMetadata::new("b", "Book");
        let processor = small_processor();
        assert_eq!(processor.process(text, &meta, None), processor.process(text, &meta, None));
    }
}
