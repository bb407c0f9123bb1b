//! Text extraction seam and page assembly.
//!
//! Extractors turn a source file into one string per page. [`assemble_pages`]
//! cleans those pages, joins them with a blank line and records where each
//! page starts, so that segments can later be attributed to page ranges.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, SegmentError};
use crate::page::PageBreakMap;

/// Separator placed between assembled pages.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Full document text plus the character offset at which each page begins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub page_breaks: PageBreakMap,
}

impl ExtractedText {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.page_breaks.len()
    }
}

/// Produces document text from a source file.
///
/// Binary formats such as PDF are handled by implementations outside this
/// crate; [`PlainTextExtractor`] covers already-extracted text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the text of the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::ExtractionError`] or [`SegmentError::Io`] when the
    /// source cannot be read.
    async fn extract(&self, path: &Path) -> Result<ExtractedText>;
}

/// Clean one page of extracted text.
///
/// Drops lines consisting only of one to three digits (page numbers),
/// collapses runs of whitespace inside lines to one space and keeps at most
/// one blank line in a row.
pub fn clean_page_text(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = false;

    for line in text.split('\n') {
        let stripped = line.trim();
        if is_page_number(stripped) {
            continue;
        }
        let cleaned = line.split_whitespace().collect::<Vec<_>>().join(" ");
        let blank = cleaned.is_empty();
        if blank && previous_blank {
            continue;
        }
        previous_blank = blank;
        lines.push(cleaned);
    }
    lines.join("\n")
}

fn is_page_number(line: &str) -> bool {
    !line.is_empty() && line.chars().count() < 4 && line.chars().all(|c| c.is_ascii_digit())
}

/// Clean each page and join them with [`PAGE_SEPARATOR`].
///
/// Page `n` (1-based) is recorded at the character offset where its cleaned
/// text starts in the joined string.
pub fn assemble_pages<I, S>(pages: I) -> ExtractedText
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let separator_chars = PAGE_SEPARATOR.chars().count();
    let mut text = String::new();
    let mut page_breaks = PageBreakMap::new();
    let mut offset = 0usize;

    for (index, page) in pages.into_iter().enumerate() {
        if index > 0 {
            text.push_str(PAGE_SEPARATOR);
            offset += separator_chars;
        }
        let cleaned = clean_page_text(page.as_ref());
        page_breaks.insert(offset, (index + 1) as u32);
        offset += cleaned.chars().count();
        text.push_str(&cleaned);
    }

    ExtractedText { text, page_breaks }
}

/// Reads UTF-8 text files, treating form feeds (`\x0c`) as page boundaries.
///
/// This matches the output of common PDF-to-text converters.
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<ExtractedText> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| SegmentError::Io { path: PathBuf::from(path), source })?;
        let raw = String::from_utf8(bytes).map_err(|e| SegmentError::ExtractionError {
            path: PathBuf::from(path),
            message: format!("not valid UTF-8: {e}"),
        })?;

        let extracted = assemble_pages(raw.split('\x0c'));
        debug!(path = %path.display(), pages = extracted.page_count(), "extracted text");
        Ok(extracted)
    }
}
