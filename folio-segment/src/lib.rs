//! Book segmentation for retrieval indexes.
//!
//! This crate turns the extracted text of long documents into [`Segment`]s:
//! bounded, overlapping chunks annotated with their chapter, section, page
//! range, content type and topics.
//!
//! - [`ChunkSplitter`] cuts text at the coarsest natural boundary that fits
//! - [`SegmentEnricher`] recovers structural context from pluggable [`PatternSet`]s
//! - [`DocumentProcessor`] runs split → enrich → classify for one document
//! - [`BatchProcessor`] drives many files through a [`TextExtractor`] into a [`SegmentSink`]
//!
//! Topic classification comes from [`folio_topic`].
//!
//! # Example
//!
//! ```rust
//! use folio_segment::{DocumentMetadata, process_document};
//! use folio_topic::{Taxonomy, TopicClassifier};
//!
//! let taxonomy = Taxonomy::default().with_topic("typography", ["kerning", "typeface"]);
//! let classifier = TopicClassifier::new(&taxonomy);
//! let meta = DocumentMetadata::new("type_book", "On Type");
//!
//! let paragraph = "Kerning adjusts the space between letters of a typeface. ".repeat(8);
//! let segments = process_document(&paragraph, &meta, None, &classifier);
//! assert_eq!(segments.len(), 1);
//! assert_eq!(segments[0].metadata.primary_topic, "typography");
//! ```

pub mod batch;
pub mod catalog;
pub mod config;
pub mod document;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod inmemory;
pub mod page;
pub mod patterns;
pub mod pipeline;
pub mod sink;
pub mod splitter;

pub use batch::{BatchProcessor, BatchProcessorBuilder, DEFAULT_BATCH_SIZE, ProcessingStats};
pub use catalog::{BookCatalog, CatalogEntry, placeholder_metadata};
pub use config::{ChunkerConfig, DEFAULT_SEPARATORS, EnricherConfig, SegmentConfig, SegmentConfigBuilder};
pub use document::{ContentType, DocumentMetadata, Segment, SegmentMetadata, segment_id};
pub use enrich::{SegmentEnricher, StructuralContext};
pub use error::{Result, SegmentError};
pub use extract::{ExtractedText, PlainTextExtractor, TextExtractor, assemble_pages, clean_page_text};
pub use inmemory::InMemorySegmentSink;
pub use page::PageBreakMap;
pub use patterns::{PatternMatch, PatternMatcher, PatternSet, RegexPattern};
pub use pipeline::{DocumentProcessor, DocumentProcessorBuilder, process_document};
pub use sink::SegmentSink;
pub use splitter::{ChunkSpan, ChunkSplitter};
