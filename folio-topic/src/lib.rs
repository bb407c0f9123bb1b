//! Keyword taxonomy support for Folio.
//!
//! This crate provides:
//! - The taxonomy model (topics in declaration order plus classification settings)
//! - Tolerant YAML taxonomy loading
//! - An inverted keyword index built once per taxonomy
//! - Lexical multi-label topic classification
//!
//! Classification is purely lexical: every keyword is counted as a
//! case-insensitive whole word and topic scores are the sum of their keywords'
//! counts.

mod classify;
mod error;
mod index;
mod model;
mod parser;

pub use classify::{Classification, TopicClassifier, TopicScore};
pub use error::{TopicError, TopicResult};
pub use index::{KeywordEntry, KeywordIndex};
pub use model::{
    ClassificationSettings, DEFAULT_MAX_TOPICS_PER_CHUNK, DEFAULT_MIN_KEYWORD_MATCHES, Taxonomy,
    TopicDefinition,
};
pub use parser::{load_taxonomy, parse_taxonomy};
