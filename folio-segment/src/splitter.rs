//! Boundary-aware chunk splitting.
//!
//! [`ChunkSplitter`] cuts text at the coarsest natural boundary that yields
//! pieces of at most `target_size` characters, merges neighbouring pieces back
//! up to `target_size`, and carries up to `overlap` characters of trailing
//! context into each following chunk.

use std::collections::VecDeque;
use std::ops::Range;

use tracing::trace;

use crate::config::ChunkerConfig;
use crate::error::Result;

/// A chunk of the source text and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSpan {
    /// The chunk text, trimmed of surrounding whitespace.
    pub text: String,
    /// Character offset of the chunk's first character in the source text.
    pub start: usize,
    /// Byte offset of the chunk's first character in the source text.
    pub byte_start: usize,
}

impl ChunkSpan {
    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Character offset one past the chunk's last character.
    pub fn end(&self) -> usize {
        self.start + self.char_len()
    }

    /// Byte range of the chunk in the source text.
    pub fn byte_range(&self) -> Range<usize> {
        self.byte_start..self.byte_start + self.text.len()
    }
}

/// A contiguous byte range of the source with its length in characters.
#[derive(Debug, Clone, Copy)]
struct Piece {
    start: usize,
    end: usize,
    chars: usize,
}

/// Splits documents into bounded, overlapping chunks.
#[derive(Debug, Clone, Default)]
pub struct ChunkSplitter {
    config: ChunkerConfig,
}

impl ChunkSplitter {
    /// Create a splitter after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::ConfigError`](crate::SegmentError::ConfigError)
    /// for inconsistent sizes.
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Split `text` into chunks in document order.
    ///
    /// Empty or whitespace-only text yields no chunks. Chunks shorter than
    /// `min_size` after trimming are dropped; no chunk exceeds `max_size`.
    pub fn split(&self, text: &str) -> Vec<ChunkSpan> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let separators: Vec<&str> =
            self.config.separators.iter().map(String::as_str).filter(|s| !s.is_empty()).collect();
        let mut pieces = Vec::new();
        self.split_range(text, 0, text.len(), &separators, &mut pieces);

        let windows = self.merge(&pieces);
        let mut cursor = CharCursor::new(text);
        let mut dropped = 0usize;
        let chunks: Vec<ChunkSpan> = windows
            .into_iter()
            .filter_map(|window| {
                let raw = &text[window.clone()];
                let content = raw.trim();
                if content.is_empty() || content.chars().count() < self.config.min_size {
                    dropped += 1;
                    return None;
                }
                let byte_start = window.start + (raw.len() - raw.trim_start().len());
                Some(ChunkSpan {
                    text: content.to_string(),
                    start: cursor.char_offset(byte_start),
                    byte_start,
                })
            })
            .collect();

        trace!(pieces = pieces.len(), chunks = chunks.len(), dropped, "split text");
        chunks
    }

    /// Recursively split `text[start..end]` into pieces of at most `target_size`
    /// characters, using the first separator that occurs and handing oversized
    /// parts to the remaining, finer separators.
    fn split_range(
        &self,
        text: &str,
        start: usize,
        end: usize,
        separators: &[&str],
        out: &mut Vec<Piece>,
    ) {
        let slice = &text[start..end];
        let chars = slice.chars().count();
        if chars <= self.config.target_size {
            out.push(Piece { start, end, chars });
            return;
        }

        let Some(level) = separators.iter().position(|sep| slice.contains(sep)) else {
            self.hard_cut(text, start, end, chars, out);
            return;
        };
        let separator = separators[level];
        let finer = &separators[level + 1..];

        // the separator stays at the end of the piece it terminates
        let mut piece_start = start;
        for (idx, _) in slice.match_indices(separator) {
            let piece_end = start + idx + separator.len();
            self.split_range(text, piece_start, piece_end, finer, out);
            piece_start = piece_end;
        }
        if piece_start < end {
            self.split_range(text, piece_start, end, finer, out);
        }
    }

    /// Last resort for text with no usable separator: keep it whole up to
    /// `max_size`, otherwise cut into `max_size` windows, each ending after
    /// its last whitespace when there is one.
    fn hard_cut(&self, text: &str, start: usize, end: usize, chars: usize, out: &mut Vec<Piece>) {
        let max = self.config.max_size;
        if chars <= max {
            out.push(Piece { start, end, chars });
            return;
        }

        let mut cursor = start;
        while cursor < end {
            let rest = &text[cursor..end];
            let rest_chars = rest.chars().count();
            if rest_chars <= max {
                out.push(Piece { start: cursor, end, chars: rest_chars });
                break;
            }
            let limit = rest.char_indices().nth(max).map_or(rest.len(), |(i, _)| i);
            let cut = rest[..limit]
                .char_indices()
                .rev()
                .find(|&(i, c)| i > 0 && c.is_whitespace())
                .map_or(limit, |(i, c)| i + c.len_utf8());
            let piece_end = cursor + cut;
            out.push(Piece {
                start: cursor,
                end: piece_end,
                chars: text[cursor..piece_end].chars().count(),
            });
            cursor = piece_end;
        }
    }

    /// Greedily merge consecutive pieces into windows of at most `target_size`
    /// characters. After each emitted window, trailing pieces totalling at most
    /// `overlap` characters are kept as the head of the next window.
    fn merge(&self, pieces: &[Piece]) -> Vec<Range<usize>> {
        let target = self.config.target_size;
        let overlap = self.config.overlap;

        let mut windows = Vec::new();
        let mut current: VecDeque<Piece> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            if !current.is_empty() && total + piece.chars > target {
                windows.push(window_range(&current));
                while let Some(front) = current.front() {
                    if total > overlap || total + piece.chars > target {
                        total -= front.chars;
                        current.pop_front();
                    } else {
                        break;
                    }
                }
            }
            current.push_back(piece);
            total += piece.chars;
        }
        if !current.is_empty() {
            windows.push(window_range(&current));
        }
        windows
    }
}

fn window_range(pieces: &VecDeque<Piece>) -> Range<usize> {
    match (pieces.front(), pieces.back()) {
        (Some(first), Some(last)) => first.start..last.end,
        _ => 0..0,
    }
}

/// Converts byte offsets to character offsets, reusing the previous position
/// when offsets arrive in ascending order.
pub(crate) struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, byte: 0, chars: 0 }
    }

    pub(crate) fn char_offset(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}
