//! Pluggable text heuristics for headings and code.
//!
//! Every heuristic is a [`PatternMatcher`]: something that reports the spans it
//! matches in a text, each with a label. Matchers are grouped into ordered
//! [`PatternSet`]s where position is priority, so heading conventions and code
//! markers can be extended without touching the splitter or enricher.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use regex::Regex;

use crate::error::{Result, SegmentError};

/// One match reported by a [`PatternMatcher`].
///
/// `start`/`end` are byte offsets into the searched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub start: usize,
    pub end: usize,
    /// Human-readable label, e.g. the heading text.
    pub label: String,
}

impl PatternMatch {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A heuristic that locates spans of interest in text.
pub trait PatternMatcher: Send + Sync + fmt::Debug {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// All non-overlapping matches in `text`, in order of position.
    fn match_spans(&self, text: &str) -> Vec<PatternMatch>;

    /// Whether the pattern occurs anywhere in `text`.
    fn is_match(&self, text: &str) -> bool {
        !self.match_spans(text).is_empty()
    }
}

/// A [`PatternMatcher`] backed by a regular expression.
///
/// The label of a match is its non-empty capture groups joined by a space, or
/// the whole match when the pattern has no participating groups.
#[derive(Debug, Clone)]
pub struct RegexPattern {
    name: String,
    regex: Regex,
}

impl RegexPattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::PatternError`] if the expression is invalid.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let regex =
            Regex::new(pattern).map_err(|source| SegmentError::PatternError { name: name.clone(), source })?;
        Ok(Self { name, regex })
    }

    fn builtin(name: &str, pattern: &str) -> Self {
        Self::new(name, pattern).expect("unreachable error: built-in pattern must compile")
    }
}

impl PatternMatcher for RegexPattern {
    fn name(&self) -> &str {
        &self.name
    }

    fn match_spans(&self, text: &str) -> Vec<PatternMatch> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let groups: Vec<&str> = caps
                    .iter()
                    .skip(1)
                    .flatten()
                    .map(|m| m.as_str().trim())
                    .filter(|s| !s.is_empty())
                    .collect();
                let label =
                    if groups.is_empty() { whole.as_str().trim().to_string() } else { groups.join(" ") };
                Some(PatternMatch { start: whole.start(), end: whole.end(), label })
            })
            .collect()
    }

    fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// An ordered list of matchers; earlier matchers have higher priority.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    matchers: Vec<Arc<dyn PatternMatcher>>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a matcher with the lowest priority so far.
    pub fn with(mut self, matcher: impl PatternMatcher + 'static) -> Self {
        self.push(matcher);
        self
    }

    pub fn push(&mut self, matcher: impl PatternMatcher + 'static) {
        self.matchers.push(Arc::new(matcher));
    }

    /// Append every matcher of `other` after the existing ones.
    pub fn extend(&mut self, other: &PatternSet) {
        self.matchers.extend(other.matchers.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(|m| m.name())
    }

    /// The last match of the highest-priority matcher that matches at all.
    pub fn last_match(&self, text: &str) -> Option<PatternMatch> {
        self.matchers.iter().find_map(|m| m.match_spans(text).pop())
    }

    /// The first match of the highest-priority matcher that matches at all.
    pub fn first_match(&self, text: &str) -> Option<PatternMatch> {
        self.matchers.iter().find_map(|m| m.match_spans(text).into_iter().next())
    }

    /// Whether any matcher matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(text))
    }

    /// Union of all matched spans, sorted and with overlaps merged.
    pub fn covered_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = self
            .matchers
            .iter()
            .flat_map(|m| m.match_spans(text))
            .map(|m| m.span())
            .filter(|s| !s.is_empty())
            .collect();
        spans.sort_by_key(|s| (s.start, s.end));

        let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
        for span in spans {
            match merged.last_mut() {
                Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
                _ => merged.push(span),
            }
        }
        merged
    }

    /// Number of characters covered by at least one match.
    pub fn covered_chars(&self, text: &str) -> usize {
        self.covered_spans(text).into_iter().map(|s| text[s].chars().count()).sum()
    }
}

/// Chapter markers searched backwards from a chunk, highest priority first:
/// `Chapter N: Title` (any case), markdown headings, `N. Title` lines.
pub fn chapter_patterns() -> PatternSet {
    PatternSet::new()
        .with(RegexPattern::builtin("chapter_marker", r"(?i)chapter\s+(\d+)[:\s]+([^\n]+)"))
        .with(RegexPattern::builtin("markdown_heading", r"(?m)^#+[ \t]+(.+)$"))
        .with(RegexPattern::builtin("numbered_heading", r"(?m)^(\d+\.)[ \t]+([^\n]+)"))
}

/// Section headings, matched against one trimmed line at a time: markdown
/// headings, short capitalized lines without sentence punctuation, `N.N` lines.
pub fn section_patterns() -> PatternSet {
    PatternSet::new()
        .with(RegexPattern::builtin("markdown_heading", r"^#+\s+(.+)$"))
        .with(RegexPattern::builtin("capitalized_line", r"^([A-Z][^.!?]{0,98})$"))
        .with(RegexPattern::builtin("numbered_subsection", r"^(\d+\.\d+.*)$"))
}

/// Block-level code: fenced blocks, `<code>` elements, indented lines.
/// These spans make up the code density of a chunk.
pub fn code_block_patterns() -> PatternSet {
    PatternSet::new()
        .with(RegexPattern::builtin("fenced_block", r"(?s)```.*?```"))
        .with(RegexPattern::builtin("html_code", r"(?s)<code>.*?</code>"))
        .with(RegexPattern::builtin("indented_line", r"(?m)^(?: {4}|\t)[ \t]*\S[^\n]*"))
}

/// Every code signal: the block patterns plus syntax markers such as function
/// and class definitions, brace-opening lines and `;`-terminated lines.
pub fn code_marker_patterns() -> PatternSet {
    let mut set = code_block_patterns();
    set.push(RegexPattern::builtin("js_function", r"function\s*\("));
    set.push(RegexPattern::builtin("py_def", r"def\s+\w+\("));
    set.push(RegexPattern::builtin("class_definition", r"\bclass\s+\w+"));
    set.push(RegexPattern::builtin("opening_brace", r"\{\s*\n"));
    set.push(RegexPattern::builtin("statement_end", r"(?m);[ \t\r]*$"));
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sets_compile() {
        assert_eq!(chapter_patterns().len(), 3);
        assert_eq!(section_patterns().len(), 3);
        assert_eq!(code_block_patterns().len(), 3);
        assert_eq!(code_marker_patterns().len(), 8);
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let err = RegexPattern::new("broken", "(unclosed").unwrap_err();
        assert!(matches!(err, SegmentError::PatternError { .. }));
    }

    #[test]
    fn label_joins_capture_groups() {
        let pattern = RegexPattern::new("chapter", r"(?i)chapter\s+(\d+)[:\s]+([^\n]+)").unwrap();
        let matches = pattern.match_spans("CHAPTER 3: Grids\n");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].label, "3 Grids");
    }

    #[test]
    fn label_without_groups_is_the_whole_match() {
        let pattern = RegexPattern::new("semi", r";").unwrap();
        let matches = pattern.match_spans("a; b;");
        assert_eq!(matches.iter().map(|m| m.start).collect::<Vec<_>>(), vec![1, 4]);
        assert_eq!(matches[0].label, ";");
    }

    #[test]
    fn last_match_respects_priority_before_position() {
        let set = chapter_patterns();
        let text = "Chapter 1: Basics\n\n# Later heading\n\nChapter 2: Color\n\n## Even later\n";
        let found = set.last_match(text).unwrap();
        assert_eq!(found.label, "2 Color");
    }

    #[test]
    fn covered_spans_merge_overlaps() {
        let set = PatternSet::new()
            .with(RegexPattern::new("a", "abc").unwrap())
            .with(RegexPattern::new("b", "bcd").unwrap())
            .with(RegexPattern::new("c", "xyz").unwrap());
        let text = "abcd--xyz";
        assert_eq!(set.covered_spans(text), vec![0..4, 6..9]);
        assert_eq!(set.covered_chars(text), 7);
    }

    #[test]
    fn covered_chars_counts_characters_not_bytes() {
        let set = PatternSet::new().with(RegexPattern::new("e", "é+").unwrap());
        assert_eq!(set.covered_chars("aéééb"), 3);
    }

    #[test]
    fn code_markers_detect_syntax() {
        let markers = code_marker_patterns();
        assert!(markers.is_match("def render(x):"));
        assert!(markers.is_match("const x = 1;\nnext"));
        assert!(markers.is_match(".button {\n  color: red\n}"));
        assert!(markers.is_match("    indented code"));
        assert!(!markers.is_match("Plain prose about color and contrast."));
    }

    #[test]
    fn extend_appends_with_lower_priority() {
        let mut set = section_patterns();
        set.extend(&PatternSet::new().with(RegexPattern::new("roman", r"^([IVX]+\..*)$").unwrap()));
        assert_eq!(set.names().last(), Some("roman"));
    }
}
