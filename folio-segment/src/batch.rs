//! Batch driver: many source files → segments → sink.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::catalog::BookCatalog;
use crate::document::Segment;
use crate::error::{Result, SegmentError};
use crate::extract::TextExtractor;
use crate::pipeline::DocumentProcessor;
use crate::sink::SegmentSink;

/// Default number of segments sent to the sink per upsert call.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Topic label used in statistics for segments without a primary topic.
pub const UNCLASSIFIED: &str = "unclassified";

/// Totals collected over one batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessingStats {
    pub documents_processed: usize,
    pub documents_failed: usize,
    /// Files skipped because the catalog lists them as duplicates.
    pub documents_skipped: usize,
    pub total_pages: usize,
    pub total_segments: usize,
    /// Sum of segment lengths in characters.
    pub total_characters: usize,
    /// Segment count per primary topic.
    pub topic_distribution: BTreeMap<String, usize>,
}

impl ProcessingStats {
    /// Count the segments of one successfully processed document.
    pub fn record(&mut self, segments: &[Segment]) {
        self.documents_processed += 1;
        self.total_segments += segments.len();
        for segment in segments {
            self.total_characters += segment.content.chars().count();
            let topic = match segment.metadata.primary_topic.as_str() {
                "" => UNCLASSIFIED,
                topic => topic,
            };
            *self.topic_distribution.entry(topic.to_string()).or_default() += 1;
        }
    }

    /// Topics ordered by descending segment count, ties by name.
    pub fn topics_by_count(&self) -> Vec<(&str, usize)> {
        let mut topics: Vec<(&str, usize)> =
            self.topic_distribution.iter().map(|(t, &n)| (t.as_str(), n)).collect();
        topics.sort_by(|a, b| b.1.cmp(&a.1));
        topics
    }
}

/// Runs source files through extraction, segmentation and the sink.
///
/// One failing document never aborts the run: it is logged and counted in
/// [`ProcessingStats::documents_failed`].
pub struct BatchProcessor {
    processor: Arc<DocumentProcessor>,
    extractor: Arc<dyn TextExtractor>,
    sink: Arc<dyn SegmentSink>,
    catalog: BookCatalog,
    batch_size: usize,
}

impl BatchProcessor {
    /// Create a new builder for constructing a [`BatchProcessor`].
    pub fn builder() -> BatchProcessorBuilder {
        BatchProcessorBuilder::default()
    }

    pub fn catalog(&self) -> &BookCatalog {
        &self.catalog
    }

    pub fn sink(&self) -> &Arc<dyn SegmentSink> {
        &self.sink
    }

    /// Process every path in order and return the collected statistics.
    pub async fn run<P: AsRef<Path>>(&self, paths: &[P]) -> ProcessingStats {
        let mut stats = ProcessingStats::default();
        info!(document_count = paths.len(), "starting batch");

        for path in paths {
            let path = path.as_ref();
            let filename = file_name(path);
            if self.catalog.is_duplicate(&filename) {
                info!(filename = %filename, "skipping duplicate");
                stats.documents_skipped += 1;
                continue;
            }

            match self.process_path(path).await {
                Ok((segments, pages)) => {
                    stats.total_pages += pages;
                    stats.record(&segments);
                }
                Err(e) => {
                    error!(filename = %filename, error = %e, "failed to process document");
                    stats.documents_failed += 1;
                }
            }
        }

        info!(
            documents_processed = stats.documents_processed,
            documents_failed = stats.documents_failed,
            documents_skipped = stats.documents_skipped,
            total_segments = stats.total_segments,
            total_characters = stats.total_characters,
            "batch complete"
        );
        stats
    }

    /// Process a single file and upsert its segments.
    ///
    /// Returns the segments and the number of extracted pages. A file with no
    /// text yields no segments.
    ///
    /// # Errors
    ///
    /// Returns the extractor's error, or [`SegmentError::SinkError`] if an
    /// upsert fails.
    pub async fn process_path(&self, path: &Path) -> Result<(Vec<Segment>, usize)> {
        let filename = file_name(path);
        let metadata = self.catalog.metadata_for(&filename);
        info!(document.id = %metadata.id, title = %metadata.title, "processing document");

        let extracted = self.extractor.extract(path).await?;
        let pages = extracted.page_count();
        if extracted.is_empty() {
            warn!(filename = %filename, "no text extracted");
            return Ok((Vec::new(), pages));
        }

        let segments = self.processor.process(&extracted.text, &metadata, Some(&extracted.page_breaks));
        for batch in segments.chunks(self.batch_size) {
            self.sink.upsert(batch).await.map_err(|e| {
                error!(document.id = %metadata.id, error = %e, "upsert failed");
                SegmentError::SinkError {
                    backend: "sink".to_string(),
                    message: format!("upsert failed for document '{}': {e}", metadata.id),
                }
            })?;
        }

        info!(document.id = %metadata.id, segment_count = segments.len(), pages, "indexed document");
        Ok((segments, pages))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy()).into_owned()
}

/// Builder for constructing a [`BatchProcessor`].
///
/// `processor`, `extractor` and `sink` are required; the catalog defaults to
/// empty and the batch size to [`DEFAULT_BATCH_SIZE`].
#[derive(Default)]
pub struct BatchProcessorBuilder {
    processor: Option<Arc<DocumentProcessor>>,
    extractor: Option<Arc<dyn TextExtractor>>,
    sink: Option<Arc<dyn SegmentSink>>,
    catalog: BookCatalog,
    batch_size: Option<usize>,
}

impl BatchProcessorBuilder {
    pub fn processor(mut self, processor: Arc<DocumentProcessor>) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn SegmentSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn catalog(mut self, catalog: BookCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set how many segments are sent per upsert call.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    /// Build the [`BatchProcessor`].
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::ConfigError`] if a required component is missing
    /// or the batch size is zero.
    pub fn build(self) -> Result<BatchProcessor> {
        let processor = self
            .processor
            .ok_or_else(|| SegmentError::ConfigError("processor is required".to_string()))?;
        let extractor = self
            .extractor
            .ok_or_else(|| SegmentError::ConfigError("extractor is required".to_string()))?;
        let sink =
            self.sink.ok_or_else(|| SegmentError::ConfigError("sink is required".to_string()))?;
        let batch_size = self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(SegmentError::ConfigError("batch_size must be greater than zero".to_string()));
        }
        Ok(BatchProcessor { processor, extractor, sink, catalog: self.catalog, batch_size })
    }
}
