//! Book catalog: per-file document metadata and known duplicates.
//!
//! ```yaml
//! books:
//!   - filename: color-basics.pdf
//!     id: color_basics
//!     title: Color Basics
//!     author: A. Painter
//!     year: 2018
//!     tags: [color]
//!     primary_topics: [color_theory]
//! duplicates:
//!   - color-basics (1).pdf
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::DocumentMetadata;
use crate::error::{Result, SegmentError};

/// Maximum length, in characters, of a placeholder document id.
const PLACEHOLDER_ID_CHARS: usize = 50;

/// One `books:` entry: a file name plus its document metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub filename: String,
    #[serde(flatten)]
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    books: Vec<CatalogEntry>,
    #[serde(default)]
    duplicates: Vec<String>,
}

/// Lookup of document metadata by source file name.
#[derive(Debug, Clone, Default)]
pub struct BookCatalog {
    books: HashMap<String, DocumentMetadata>,
    duplicates: HashSet<String>,
}

impl BookCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog document. Empty input is an empty catalog.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: CatalogFile = serde_yaml::from_str(content)?;
        let mut catalog = Self::default();
        for entry in file.books {
            catalog.insert(entry);
        }
        catalog.duplicates.extend(file.duplicates);
        Ok(catalog)
    }

    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| SegmentError::Io { path: path.to_path_buf(), source })?;
        Self::from_yaml_str(&content)
    }

    /// Add or replace the entry for `entry.filename`.
    pub fn insert(&mut self, entry: CatalogEntry) {
        if self.books.contains_key(&entry.filename) {
            warn!(filename = %entry.filename, "duplicate catalog entry, keeping the last one");
        }
        let mut metadata = entry.metadata;
        if metadata.id.is_empty() {
            metadata.id = placeholder_id(&entry.filename);
        }
        if metadata.title.is_empty() {
            metadata.title = entry.filename.clone();
        }
        self.books.insert(entry.filename, metadata);
    }

    /// Mark `filename` as a duplicate to be skipped.
    pub fn mark_duplicate(&mut self, filename: impl Into<String>) {
        self.duplicates.insert(filename.into());
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, filename: &str) -> Option<&DocumentMetadata> {
        self.books.get(filename)
    }

    pub fn is_duplicate(&self, filename: &str) -> bool {
        self.duplicates.contains(filename)
    }

    /// Catalog metadata for `filename`, or placeholder metadata if it has no entry.
    pub fn metadata_for(&self, filename: &str) -> DocumentMetadata {
        match self.books.get(filename) {
            Some(metadata) => metadata.clone(),
            None => {
                warn!(filename, "no catalog metadata, using placeholders");
                placeholder_metadata(filename)
            }
        }
    }
}

/// Metadata for a file with no catalog entry: the id is the file stem
/// (at most 50 characters), the title is the file name.
pub fn placeholder_metadata(filename: &str) -> DocumentMetadata {
    DocumentMetadata::new(placeholder_id(filename), filename)
}

fn placeholder_id(filename: &str) -> String {
    let stem = Path::new(filename).file_stem().and_then(|s| s.to_str()).unwrap_or(filename);
    stem.chars().take(PLACEHOLDER_ID_CHARS).collect()
}
