//! In-memory segment sink.
//!
//! [`InMemorySegmentSink`] keeps segments in a `HashMap` behind a
//! `tokio::sync::RwLock`. It is meant for tests and small corpora.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::Segment;
use crate::error::Result;
use crate::sink::SegmentSink;

/// Segments held in memory, keyed by segment id.
#[derive(Debug, Default)]
pub struct InMemorySegmentSink {
    segments: RwLock<HashMap<String, Segment>>,
}

impl InMemorySegmentSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stored segment.
    pub async fn get(&self, id: &str) -> Option<Segment> {
        self.segments.read().await.get(id).cloned()
    }

    /// All stored segments of one source document, ordered by id.
    pub async fn segments_for(&self, source_id: &str) -> Vec<Segment> {
        let segments = self.segments.read().await;
        let mut found: Vec<Segment> =
            segments.values().filter(|s| s.metadata.source_id == source_id).cloned().collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }
}

#[async_trait]
impl SegmentSink for InMemorySegmentSink {
    async fn upsert(&self, segments: &[Segment]) -> Result<()> {
        let mut store = self.segments.write().await;
        for segment in segments {
            store.insert(segment.id.clone(), segment.clone());
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.segments.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SegmentMetadata;

    fn segment(source: &str, content: &str) -> Segment {
        let metadata = SegmentMetadata { source_id: source.into(), ..SegmentMetadata::default() };
        Segment::new(content.into(), metadata)
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let sink = InMemorySegmentSink::new();
        let batch = vec![segment("a", "one"), segment("a", "two")];

        sink.upsert(&batch).await.unwrap();
        sink.upsert(&batch).await.unwrap();

        assert_eq!(sink.count().await.unwrap(), 2);
        assert_eq!(sink.get(&batch[0].id).await.unwrap().content, "one");
    }

    #[tokio::test]
    async fn segments_are_grouped_by_source() {
        let sink = InMemorySegmentSink::new();
        sink.upsert(&[segment("a", "one"), segment("b", "two"), segment("a", "three")]).await.unwrap();

        assert_eq!(sink.segments_for("a").await.len(), 2);
        assert_eq!(sink.segments_for("c").await.len(), 0);
    }
}
