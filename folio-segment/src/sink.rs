//! Destination for finished segments.

use async_trait::async_trait;

use crate::document::Segment;
use crate::error::Result;

/// A storage backend that receives segments for indexing.
///
/// Implementations key segments by [`Segment::id`], so upserting the same
/// segment twice leaves a single copy. Embedding and similarity search are the
/// backend's business.
///
/// # Example
///
/// ```rust,ignore
/// use folio_segment::{InMemorySegmentSink, SegmentSink};
///
/// let sink = InMemorySegmentSink::new();
/// sink.upsert(&segments).await?;
/// assert_eq!(sink.count().await?, segments.len());
/// ```
#[async_trait]
pub trait SegmentSink: Send + Sync {
    /// Insert or replace segments by id.
    async fn upsert(&self, segments: &[Segment]) -> Result<()>;

    /// Number of distinct segments stored.
    async fn count(&self) -> Result<usize>;
}
