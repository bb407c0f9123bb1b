use crate::model::Taxonomy;
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// A keyword together with its whole-word matcher and the topics it votes for.
#[derive(Debug, Clone)]
pub struct KeywordEntry {
    matcher: Regex,
    topics: Vec<usize>,
}

impl KeywordEntry {
    /// Ordinals (declaration positions) of the topics this keyword belongs to.
    pub fn topics(&self) -> &[usize] {
        &self.topics
    }

    /// Number of case-insensitive whole-word occurrences in `text`.
    pub fn count_in(&self, text: &str) -> usize {
        self.matcher.find_iter(text).count()
    }
}

/// Inverted index from lowercased keyword to topics, built once per taxonomy.
///
/// The index is immutable after [`KeywordIndex::build`] and safe to share
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    topic_ids: Vec<String>,
    keywords: IndexMap<String, KeywordEntry>,
}

impl KeywordIndex {
    /// Build the index from a taxonomy.
    ///
    /// Keywords are lowercased and trimmed. A keyword listed twice under the same
    /// topic counts once for it; a keyword shared by several topics votes for
    /// each of them.
    pub fn build(taxonomy: &Taxonomy) -> Self {
        let mut topic_ids = Vec::with_capacity(taxonomy.len());
        let mut keywords: IndexMap<String, KeywordEntry> = IndexMap::new();

        for (ordinal, (topic_id, topic)) in taxonomy.topics().enumerate() {
            topic_ids.push(topic_id.to_string());
            for keyword in &topic.keywords {
                let normalized = keyword.trim().to_lowercase();
                if normalized.is_empty() {
                    continue;
                }
                if let Some(entry) = keywords.get_mut(&normalized) {
                    if !entry.topics.contains(&ordinal) {
                        entry.topics.push(ordinal);
                    }
                    continue;
                }
                match whole_word_matcher(&normalized) {
                    Ok(matcher) => {
                        keywords.insert(normalized, KeywordEntry { matcher, topics: vec![ordinal] });
                    }
                    Err(e) => {
                        warn!(topic = topic_id, keyword = %normalized, error = %e, "skipping keyword");
                    }
                }
            }
        }

        Self { topic_ids, keywords }
    }

    /// Topic ids in taxonomy declaration order; ordinals index into this slice.
    pub fn topic_ids(&self) -> &[String] {
        &self.topic_ids
    }

    /// Look up the topics a keyword belongs to (case-insensitive).
    pub fn topics_for(&self, keyword: &str) -> Vec<&str> {
        self.keywords
            .get(&keyword.trim().to_lowercase())
            .map(|entry| entry.topics.iter().map(|&i| self.topic_ids[i].as_str()).collect())
            .unwrap_or_default()
    }

    /// Iterate indexed keywords in first-declared order.
    pub fn keywords(&self) -> impl Iterator<Item = (&str, &KeywordEntry)> {
        self.keywords.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Per-topic scores for `text`, indexed by topic ordinal.
    pub fn score(&self, text: &str) -> Vec<usize> {
        let mut scores = vec![0; self.topic_ids.len()];
        if text.is_empty() {
            return scores;
        }
        for entry in self.keywords.values() {
            let count = entry.count_in(text);
            if count == 0 {
                continue;
            }
            for &ordinal in &entry.topics {
                scores[ordinal] += count;
            }
        }
        scores
    }
}

fn whole_word_matcher(keyword: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(keyword))).case_insensitive(true).build()
}
