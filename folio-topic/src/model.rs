//! Taxonomy data model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default minimum aggregate score for a topic to be accepted.
pub const DEFAULT_MIN_KEYWORD_MATCHES: usize = 2;

/// Default cap on topics returned per segment, primary included.
pub const DEFAULT_MAX_TOPICS_PER_CHUNK: usize = 3;

/// Thresholds applied when turning topic scores into a classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClassificationSettings {
    /// Minimum aggregate keyword score for a topic to survive filtering.
    pub min_keyword_matches: usize,
    /// Maximum number of topics returned, primary included.
    pub max_topics_per_chunk: usize,
}

impl Default for ClassificationSettings {
    fn default() -> Self {
        Self {
            min_keyword_matches: DEFAULT_MIN_KEYWORD_MATCHES,
            max_topics_per_chunk: DEFAULT_MAX_TOPICS_PER_CHUNK,
        }
    }
}

/// A single topic and the keywords that vote for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicDefinition {
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Keywords matched case-insensitively as whole words.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl TopicDefinition {
    /// Create a topic from a keyword list.
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { keywords: keywords.into_iter().map(Into::into).collect(), ..Self::default() }
    }
}

/// A keyword taxonomy: topics in declaration order plus classification settings.
///
/// Declaration order is significant, it breaks ties between equally scored topics.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Taxonomy {
    topics: IndexMap<String, TopicDefinition>,
    settings: ClassificationSettings,
}

impl Taxonomy {
    /// Create an empty taxonomy with the given settings.
    pub fn new(settings: ClassificationSettings) -> Self {
        Self { topics: IndexMap::new(), settings }
    }

    /// Add a topic built from a keyword list, returning the taxonomy.
    pub fn with_topic<I, S>(mut self, id: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_topic(id, TopicDefinition::with_keywords(keywords));
        self
    }

    /// Insert or replace a topic. A replaced topic keeps its original position.
    pub fn insert_topic(&mut self, id: impl Into<String>, topic: TopicDefinition) {
        self.topics.insert(id.into(), topic);
    }

    /// Look up a topic by id.
    pub fn topic(&self, id: &str) -> Option<&TopicDefinition> {
        self.topics.get(id)
    }

    /// Iterate topics in declaration order.
    pub fn topics(&self) -> impl Iterator<Item = (&str, &TopicDefinition)> {
        self.topics.iter().map(|(id, topic)| (id.as_str(), topic))
    }

    /// Topic ids in declaration order.
    pub fn topic_ids(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    pub fn settings(&self) -> &ClassificationSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: ClassificationSettings) {
        self.settings = settings;
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_declaration_order() {
        let taxonomy = Taxonomy::default()
            .with_topic("typography", ["font"])
            .with_topic("color", ["hue"])
            .with_topic("layout", ["grid"]);

        let ids: Vec<_> = taxonomy.topic_ids().collect();
        assert_eq!(ids, vec!["typography", "color", "layout"]);
    }

    #[test]
    fn replacing_a_topic_keeps_its_position() {
        let mut taxonomy = Taxonomy::default().with_topic("a", ["x"]).with_topic("b", ["y"]);
        taxonomy.insert_topic("a", TopicDefinition::with_keywords(["z"]));

        let ids: Vec<_> = taxonomy.topic_ids().collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(taxonomy.topic("a").unwrap().keywords, vec!["z"]);
    }

    #[test]
    fn default_settings() {
        let settings = ClassificationSettings::default();
        assert_eq!(settings.min_keyword_matches, 2);
        assert_eq!(settings.max_topics_per_chunk, 3);
    }
}
