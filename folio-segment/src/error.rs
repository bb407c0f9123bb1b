//! Error types for the `folio-segment` crate.

use std::path::PathBuf;

use folio_topic::TopicError;
use thiserror::Error;

/// Errors that can occur while configuring or driving segmentation.
///
/// Per-document data problems are not errors: empty text, unmatched topics and
/// missing page maps all have defined fallback values.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A heuristic pattern failed to compile.
    #[error("Invalid pattern '{name}': {source}")]
    PatternError {
        /// Name of the pattern.
        name: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The text extraction collaborator failed for a source document.
    #[error("Extraction error ({path}): {message}")]
    ExtractionError {
        /// The source document path.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the segment sink backend.
    #[error("Sink error ({backend}): {message}")]
    SinkError {
        /// The sink backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration or catalog file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration or catalog document is not valid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An error propagated from `folio-topic`.
    #[error(transparent)]
    Topic(#[from] TopicError),
}

/// A convenience result type for segmentation operations.
pub type Result<T> = std::result::Result<T, SegmentError>;
