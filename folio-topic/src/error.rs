//! Error types for the `folio-topic` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a taxonomy.
#[derive(Debug, Error)]
pub enum TopicError {
    /// The taxonomy file could not be read.
    #[error("failed to read taxonomy {path}: {source}")]
    Io {
        /// Path of the taxonomy file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The taxonomy document is not valid YAML.
    #[error("invalid taxonomy YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The taxonomy document is valid YAML but not a mapping at the top level.
    #[error("invalid taxonomy: {0}")]
    InvalidTaxonomy(String),
}

/// A convenience result type for topic operations.
pub type TopicResult<T> = std::result::Result<T, TopicError>;
