//! Configuration for segmentation and enrichment.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmentError};

/// Default separators, coarsest first: section, paragraph, line, sentence, clause, word.
pub const DEFAULT_SEPARATORS: [&str; 6] = ["\n\n\n", "\n\n", "\n", ". ", ", ", " "];

/// Size and boundary parameters for the chunk splitter. All sizes are in characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Preferred maximum chunk length; pieces are merged up to this size.
    pub target_size: usize,
    /// Hard upper bound on chunk length.
    pub max_size: usize,
    /// Chunks shorter than this after trimming are dropped.
    pub min_size: usize,
    /// Trailing context carried from one chunk into the next.
    pub overlap: usize,
    /// Boundary separators in priority order.
    pub separators: Vec<String>,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            target_size: 1200,
            max_size: 2000,
            min_size: 300,
            overlap: 200,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ChunkerConfig {
    /// Check that the size parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::ConfigError`] if:
    /// - `target_size == 0`
    /// - `min_size > target_size` or `target_size > max_size`
    /// - `overlap >= target_size`
    /// - no non-empty separator is configured
    pub fn validate(&self) -> Result<()> {
        if self.target_size == 0 {
            return Err(SegmentError::ConfigError("target_size must be greater than zero".into()));
        }
        if self.min_size > self.target_size {
            return Err(SegmentError::ConfigError(format!(
                "min_size ({}) must not exceed target_size ({})",
                self.min_size, self.target_size
            )));
        }
        if self.target_size > self.max_size {
            return Err(SegmentError::ConfigError(format!(
                "target_size ({}) must not exceed max_size ({})",
                self.target_size, self.max_size
            )));
        }
        if self.overlap >= self.target_size {
            return Err(SegmentError::ConfigError(format!(
                "overlap ({}) must be less than target_size ({})",
                self.overlap, self.target_size
            )));
        }
        if self.separators.iter().all(|s| s.is_empty()) {
            return Err(SegmentError::ConfigError(
                "at least one non-empty separator is required".into(),
            ));
        }
        Ok(())
    }
}

/// Parameters for structural enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnricherConfig {
    /// Characters before a chunk searched for the governing chapter heading.
    pub lookback_chars: usize,
    /// Leading chunk lines inspected for a section heading.
    pub section_scan_lines: usize,
    /// Code density above which a chunk is `code`.
    pub code_threshold: f64,
    /// Code density above which a chunk is `example`.
    pub example_threshold: f64,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self { lookback_chars: 2000, section_scan_lines: 5, code_threshold: 0.5, example_threshold: 0.2 }
    }
}

impl EnricherConfig {
    /// Check that the density thresholds are ordered and within `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        if !in_range(self.code_threshold) || !in_range(self.example_threshold) {
            return Err(SegmentError::ConfigError(
                "density thresholds must be within [0, 1]".into(),
            ));
        }
        if self.example_threshold > self.code_threshold {
            return Err(SegmentError::ConfigError(format!(
                "example_threshold ({}) must not exceed code_threshold ({})",
                self.example_threshold, self.code_threshold
            )));
        }
        Ok(())
    }
}

/// Complete segmentation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmentConfig {
    pub chunker: ChunkerConfig,
    pub enricher: EnricherConfig,
}

impl SegmentConfig {
    /// Create a new builder for constructing a [`SegmentConfig`].
    pub fn builder() -> SegmentConfigBuilder {
        SegmentConfigBuilder::default()
    }

    /// Validate both sections.
    pub fn validate(&self) -> Result<()> {
        self.chunker.validate()?;
        self.enricher.validate()
    }

    /// Parse and validate a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| SegmentError::Io { path: path.to_path_buf(), source })?;
        Self::from_yaml_str(&content)
    }
}

/// Builder for constructing a validated [`SegmentConfig`].
#[derive(Debug, Clone, Default)]
pub struct SegmentConfigBuilder {
    config: SegmentConfig,
}

impl SegmentConfigBuilder {
    /// Set the preferred chunk size in characters.
    pub fn target_size(mut self, size: usize) -> Self {
        self.config.chunker.target_size = size;
        self
    }

    /// Set the hard maximum chunk size in characters.
    pub fn max_size(mut self, size: usize) -> Self {
        self.config.chunker.max_size = size;
        self
    }

    /// Set the minimum trimmed chunk size in characters.
    pub fn min_size(mut self, size: usize) -> Self {
        self.config.chunker.min_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn overlap(mut self, overlap: usize) -> Self {
        self.config.chunker.overlap = overlap;
        self
    }

    /// Replace the boundary separators (coarsest first).
    pub fn separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.chunker.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Set the chapter lookback window in characters.
    pub fn lookback_chars(mut self, chars: usize) -> Self {
        self.config.enricher.lookback_chars = chars;
        self
    }

    /// Set how many leading lines are scanned for a section heading.
    pub fn section_scan_lines(mut self, lines: usize) -> Self {
        self.config.enricher.section_scan_lines = lines;
        self
    }

    /// Set the code and example density thresholds.
    pub fn density_thresholds(mut self, code: f64, example: f64) -> Self {
        self.config.enricher.code_threshold = code;
        self.config.enricher.example_threshold = example;
        self
    }

    /// Build the [`SegmentConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::ConfigError`] on inconsistent sizes or thresholds.
    pub fn build(self) -> Result<SegmentConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
