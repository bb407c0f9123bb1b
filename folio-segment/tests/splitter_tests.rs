//! Property tests for boundary-aware chunk splitting.

use folio_segment::config::ChunkerConfig;
use folio_segment::splitter::{ChunkSpan, ChunkSplitter};
use proptest::prelude::*;

/// Text assembled from words and the separators the splitter knows about,
/// including multi-byte characters.
fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            4 => "[a-zé]{1,14}",
            3 => Just(" ".to_string()),
            1 => Just("\n".to_string()),
            1 => Just("\n\n".to_string()),
            1 => Just("\n\n\n".to_string()),
            1 => Just(". ".to_string()),
            1 => Just(", ".to_string()),
            1 => "[a-z]{40,90}",
        ],
        0..200,
    )
    .prop_map(|parts| parts.concat())
}

/// A valid configuration: min ≤ target ≤ max and overlap < target.
fn arb_config() -> impl Strategy<Value = ChunkerConfig> {
    (10usize..120, 0usize..100)
        .prop_flat_map(|(target, extra)| (Just(target), Just(target + extra), 0..=target, 0..target))
        .prop_map(|(target_size, max_size, min_size, overlap)| ChunkerConfig {
            target_size,
            max_size,
            min_size,
            overlap,
            ..ChunkerConfig::default()
        })
}

fn without_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// **Property: chunk size bounds**
/// *For any* text and valid configuration, every chunk is non-empty, trimmed,
/// at most `max_size` and at least `min_size` characters long.
mod prop_size_bounds {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn chunks_respect_min_and_max(text in arb_text(), config in arb_config()) {
            let max = config.max_size;
            let min = config.min_size;
            let chunks = ChunkSplitter::new(config).unwrap().split(&text);

            for chunk in &chunks {
                let len = chunk.char_len();
                prop_assert!(len > 0);
                prop_assert!(len <= max, "chunk of {} chars exceeds max {}", len, max);
                prop_assert!(len >= min, "chunk of {} chars below min {}", len, min);
                prop_assert_eq!(chunk.text.trim(), chunk.text.as_str());
            }
        }
    }
}

/// **Property: offsets locate chunks**
/// *For any* text, each chunk's `start` is the character offset (and
/// `byte_start` the byte offset) at which the chunk text occurs in the source,
/// and starts never decrease.
mod prop_offsets {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn offsets_point_into_source(text in arb_text(), config in arb_config()) {
            let chunks = ChunkSplitter::new(config).unwrap().split(&text);

            for chunk in &chunks {
                prop_assert_eq!(&text[chunk.byte_range()], chunk.text.as_str());
                prop_assert_eq!(text[..chunk.byte_start].chars().count(), chunk.start);
            }
            for pair in chunks.windows(2) {
                prop_assert!(pair[0].start <= pair[1].start);
            }
        }
    }
}

/// **Property: nothing is lost without overlap**
/// *For any* text split with zero overlap and zero minimum size, the chunks
/// concatenated in order equal the source once whitespace is ignored.
mod prop_coverage {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn chunks_cover_source(text in arb_text(), config in arb_config()) {
            let config = ChunkerConfig { min_size: 0, overlap: 0, ..config };
            let chunks = ChunkSplitter::new(config).unwrap().split(&text);
            let joined: String = chunks.iter().map(|c: &ChunkSpan| c.text.as_str()).collect();

            prop_assert_eq!(without_whitespace(&joined), without_whitespace(&text));
        }
    }
}

/// **Property: splitting is deterministic**
mod prop_deterministic {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn same_input_same_chunks(text in arb_text(), config in arb_config()) {
            let splitter = ChunkSplitter::new(config).unwrap();
            prop_assert_eq!(splitter.split(&text), splitter.split(&text));
        }
    }
}

#[test]
fn blank_documents_yield_no_chunks() {
    let splitter = ChunkSplitter::default();
    assert!(splitter.split("").is_empty());
    assert!(splitter.split("\n\n   \t\n").is_empty());
}

#[test]
fn invalid_configuration_is_rejected() {
    let config = ChunkerConfig { target_size: 100, max_size: 50, ..ChunkerConfig::default() };
    assert!(ChunkSplitter::new(config).is_err());
}
