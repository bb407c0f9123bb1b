//! Structural enrichment of chunks: chapter, section, content type and pages.

use serde::{Deserialize, Serialize};

use crate::config::EnricherConfig;
use crate::document::ContentType;
use crate::error::Result;
use crate::page::{PageBreakMap, page_range};
use crate::patterns::{
    PatternSet, chapter_patterns, code_block_patterns, code_marker_patterns, section_patterns,
};
use crate::splitter::ChunkSpan;

/// Structural context recovered for one chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralContext {
    pub chapter: String,
    pub section: String,
    pub content_type: ContentType,
    pub has_code: bool,
    pub page_start: u32,
    pub page_end: u32,
}

/// Recovers [`StructuralContext`] for chunks of a document.
///
/// All heuristics are [`PatternSet`]s and can be replaced with the `with_*`
/// methods; the defaults cover common book conventions.
#[derive(Debug, Clone)]
pub struct SegmentEnricher {
    config: EnricherConfig,
    chapters: PatternSet,
    sections: PatternSet,
    code_blocks: PatternSet,
    code_markers: PatternSet,
}

impl Default for SegmentEnricher {
    fn default() -> Self {
        Self::from_parts(EnricherConfig::default())
    }
}

impl SegmentEnricher {
    /// Create an enricher with the built-in heuristics after validating `config`.
    pub fn new(config: EnricherConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: EnricherConfig) -> Self {
        Self {
            config,
            chapters: chapter_patterns(),
            sections: section_patterns(),
            code_blocks: code_block_patterns(),
            code_markers: code_marker_patterns(),
        }
    }

    pub fn config(&self) -> &EnricherConfig {
        &self.config
    }

    pub fn with_chapter_patterns(mut self, patterns: PatternSet) -> Self {
        self.chapters = patterns;
        self
    }

    pub fn with_section_patterns(mut self, patterns: PatternSet) -> Self {
        self.sections = patterns;
        self
    }

    /// Replace the block patterns that determine code density.
    pub fn with_code_block_patterns(mut self, patterns: PatternSet) -> Self {
        self.code_blocks = patterns;
        self
    }

    /// Replace the patterns that set `has_code`.
    pub fn with_code_marker_patterns(mut self, patterns: PatternSet) -> Self {
        self.code_markers = patterns;
        self
    }

    /// Recover the full structural context of `chunk`, a chunk of `full_text`.
    pub fn enrich(
        &self,
        chunk: &ChunkSpan,
        full_text: &str,
        page_breaks: Option<&PageBreakMap>,
    ) -> StructuralContext {
        let (page_start, page_end) = page_range(page_breaks, chunk.start, chunk.end());
        StructuralContext {
            chapter: self.chapter_before(full_text, chunk.byte_start),
            section: self.section_of(&chunk.text),
            content_type: self.content_type(&chunk.text),
            has_code: self.has_code(&chunk.text),
            page_start,
            page_end,
        }
    }

    /// The governing chapter heading: the closest match of the highest-priority
    /// chapter pattern within `lookback_chars` characters before `byte_start`.
    pub fn chapter_before(&self, full_text: &str, byte_start: usize) -> String {
        let preceding = full_text.get(..byte_start).unwrap_or_default();
        let window_start = match self.config.lookback_chars {
            0 => preceding.len(),
            n => preceding.char_indices().rev().nth(n - 1).map_or(0, |(i, _)| i),
        };
        self.chapters
            .last_match(&preceding[window_start..])
            .map(|m| m.label)
            .unwrap_or_default()
    }

    /// The first section heading among the leading lines of `chunk`.
    pub fn section_of(&self, chunk: &str) -> String {
        chunk
            .split('\n')
            .take(self.config.section_scan_lines)
            .map(str::trim)
            .find_map(|line| self.sections.first_match(line))
            .map(|m| m.label)
            .unwrap_or_default()
    }

    /// Fraction of characters of `chunk` covered by code block patterns.
    pub fn code_density(&self, chunk: &str) -> f64 {
        let total = chunk.chars().count();
        if total == 0 {
            return 0.0;
        }
        self.code_blocks.covered_chars(chunk) as f64 / total as f64
    }

    pub fn content_type(&self, chunk: &str) -> ContentType {
        let density = self.code_density(chunk);
        if density > self.config.code_threshold {
            ContentType::Code
        } else if density > self.config.example_threshold {
            ContentType::Example
        } else {
            ContentType::Prose
        }
    }

    pub fn has_code(&self, chunk: &str) -> bool {
        self.code_markers.is_match(chunk)
    }
}
