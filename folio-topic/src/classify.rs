//! Lexical topic classification.

use serde::{Deserialize, Serialize};

use crate::index::KeywordIndex;
use crate::model::{ClassificationSettings, Taxonomy};

/// The aggregate keyword score of one topic for one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicScore {
    pub topic: String,
    pub score: usize,
}

/// Result of classifying a text.
///
/// An empty `primary` means no taxonomy keyword occurred in the text; callers
/// may substitute a document-level fallback topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub primary: String,
    pub secondary: Vec<String>,
}

impl Classification {
    /// True when no keyword matched at all.
    pub fn is_unclassified(&self) -> bool {
        self.primary.is_empty()
    }

    /// Split into the `(primary, secondary)` pair.
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.primary, self.secondary)
    }
}

/// Classifies text against a keyword taxonomy.
///
/// Construction builds the [`KeywordIndex`]; classification itself only reads
/// it, so one classifier can be shared across threads behind an `Arc`.
///
/// # Example
///
/// ```
/// use folio_topic::{ClassificationSettings, Taxonomy, TopicClassifier};
///
/// let settings = ClassificationSettings { min_keyword_matches: 1, max_topics_per_chunk: 3 };
/// let taxonomy = Taxonomy::new(settings)
///     .with_topic("colors", ["palette", "hue"])
///     .with_topic("layout", ["grid"]);
///
/// let classifier = TopicClassifier::new(&taxonomy);
/// let result = classifier.classify("Choose a palette and hue that match your grid.");
/// assert_eq!(result.primary, "colors");
/// assert_eq!(result.secondary, vec!["layout"]);
/// ```
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    index: KeywordIndex,
    settings: ClassificationSettings,
}

impl TopicClassifier {
    /// Build a classifier (and its keyword index) from a taxonomy.
    pub fn new(taxonomy: &Taxonomy) -> Self {
        Self::from_index(KeywordIndex::build(taxonomy), *taxonomy.settings())
    }

    /// Wrap an already built index.
    pub fn from_index(index: KeywordIndex, settings: ClassificationSettings) -> Self {
        Self { index, settings }
    }

    pub fn index(&self) -> &KeywordIndex {
        &self.index
    }

    pub fn settings(&self) -> &ClassificationSettings {
        &self.settings
    }

    /// Topics with a non-zero score, highest first.
    ///
    /// Equal scores keep taxonomy declaration order.
    pub fn scores(&self, text: &str) -> Vec<TopicScore> {
        let mut ranked: Vec<TopicScore> = self
            .index
            .score(text)
            .into_iter()
            .zip(self.index.topic_ids())
            .filter(|(score, _)| *score > 0)
            .map(|(score, topic)| TopicScore { topic: topic.clone(), score })
            .collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    /// Assign a primary topic and up to `max_topics_per_chunk - 1` secondary topics.
    ///
    /// Topics scoring below `min_keyword_matches` are discarded, except that when
    /// none reaches the threshold the single best topic is still returned.
    pub fn classify(&self, text: &str) -> Classification {
        let ranked = self.scores(text);
        if ranked.is_empty() {
            return Classification::default();
        }

        let min = self.settings.min_keyword_matches;
        let surviving = ranked.iter().take_while(|s| s.score >= min).count().max(1);

        let mut topics = ranked.into_iter().take(surviving).map(|s| s.topic);
        let primary = topics.next().unwrap_or_default();
        let secondary = topics.take(self.settings.max_topics_per_chunk.saturating_sub(1)).collect();

        Classification { primary, secondary }
    }
}
