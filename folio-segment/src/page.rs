//! Page attribution from character-offset bookkeeping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from character offset in the full text to the 1-based page number
/// starting there.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageBreakMap {
    breaks: BTreeMap<usize, u32>,
}

impl PageBreakMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `page` begins at character `offset`.
    pub fn insert(&mut self, offset: usize, page: u32) {
        self.breaks.insert(offset, page);
    }

    pub fn len(&self) -> usize {
        self.breaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breaks.is_empty()
    }

    /// Iterate `(offset, page)` pairs in offset order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.breaks.iter().map(|(&offset, &page)| (offset, page))
    }

    /// Page associated with the greatest mapped offset ≤ `offset`, or 1 if none.
    pub fn page_at(&self, offset: usize) -> u32 {
        self.breaks.range(..=offset).next_back().map_or(1, |(_, &page)| page)
    }

    /// Pages for a span starting at `start` and ending at `end` (character offsets).
    pub fn page_range(&self, start: usize, end: usize) -> (u32, u32) {
        (self.page_at(start), self.page_at(end))
    }
}

impl FromIterator<(usize, u32)> for PageBreakMap {
    fn from_iter<I: IntoIterator<Item = (usize, u32)>>(iter: I) -> Self {
        Self { breaks: iter.into_iter().collect() }
    }
}

/// Page range of a span, or `(0, 0)` when no map (or an empty one) is available.
pub fn page_range(page_breaks: Option<&PageBreakMap>, start: usize, end: usize) -> (u32, u32) {
    match page_breaks {
        Some(map) if !map.is_empty() => map.page_range(start, end),
        _ => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_pages() -> PageBreakMap {
        [(0, 1), (500, 2), (1200, 3)].into_iter().collect()
    }

    #[test]
    fn span_within_one_page() {
        assert_eq!(three_pages().page_range(600, 1100), (2, 2));
    }

    #[test]
    fn span_across_pages() {
        assert_eq!(three_pages().page_range(450, 1300), (1, 3));
    }

    #[test]
    fn exact_break_offsets_belong_to_the_new_page() {
        let map = three_pages();
        assert_eq!(map.page_at(499), 1);
        assert_eq!(map.page_at(500), 2);
    }

    #[test]
    fn offsets_before_the_first_break_default_to_page_one() {
        let map: PageBreakMap = [(100, 7)].into_iter().collect();
        assert_eq!(map.page_range(10, 50), (1, 1));
        assert_eq!(map.page_range(10, 150), (1, 7));
    }

    #[test]
    fn no_map_means_zero_pages() {
        assert_eq!(page_range(None, 10, 20), (0, 0));
        assert_eq!(page_range(Some(&PageBreakMap::new()), 10, 20), (0, 0));
        assert_eq!(page_range(Some(&three_pages()), 10, 20), (1, 1));
    }
}
