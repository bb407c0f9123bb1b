use crate::error::{TopicError, TopicResult};
use crate::model::{ClassificationSettings, Taxonomy, TopicDefinition};
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Read and parse a taxonomy YAML file.
pub fn load_taxonomy(path: impl AsRef<Path>) -> TopicResult<Taxonomy> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|source| TopicError::Io { path: path.to_path_buf(), source })?;
    parse_taxonomy(&content)
}

/// Parse a taxonomy document of the form:
///
/// ```yaml
/// topics:
///   color_theory:
///     name: Color Theory
///     keywords: [palette, hue]
/// classification:
///   min_keyword_matches: 2
///   max_topics_per_chunk: 3
/// ```
///
/// Only structurally broken YAML is an error. A topic without a usable keyword
/// list gets an empty keyword set and unusable settings fall back to defaults.
pub fn parse_taxonomy(content: &str) -> TopicResult<Taxonomy> {
    if content.trim().is_empty() {
        return Ok(Taxonomy::default());
    }
    let root: Value = serde_yaml::from_str(content)?;
    match &root {
        Value::Mapping(_) | Value::Null => {}
        other => {
            return Err(TopicError::InvalidTaxonomy(format!(
                "expected a mapping at the top level, found {}",
                value_kind(other)
            )));
        }
    }

    let settings = match root.get("classification") {
        None | Some(Value::Null) => ClassificationSettings::default(),
        Some(value) => serde_yaml::from_value(value.clone()).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring malformed classification settings");
            ClassificationSettings::default()
        }),
    };

    let mut taxonomy = Taxonomy::new(settings);
    match root.get("topics") {
        None | Some(Value::Null) => {}
        Some(Value::Mapping(topics)) => {
            for (key, value) in topics {
                let Some(id) = scalar_to_string(key) else {
                    warn!(kind = value_kind(key), "skipping topic with a non-scalar id");
                    continue;
                };
                let topic = parse_topic(&id, value);
                taxonomy.insert_topic(id, topic);
            }
        }
        Some(other) => {
            warn!(kind = value_kind(other), "`topics` is not a mapping, taxonomy is empty");
        }
    }

    Ok(taxonomy)
}

fn parse_topic(id: &str, value: &Value) -> TopicDefinition {
    let Value::Mapping(_) = value else {
        warn!(topic = id, "topic definition is not a mapping, using no keywords");
        return TopicDefinition::default();
    };

    let name = value.get("name").and_then(scalar_to_string);
    let description = value.get("description").and_then(scalar_to_string);
    let keywords = match value.get("keywords") {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(scalar_to_string)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect(),
        None | Some(Value::Null) => {
            warn!(topic = id, "topic has no keyword list");
            Vec::new()
        }
        Some(other) => {
            warn!(topic = id, kind = value_kind(other), "topic keywords are not a list");
            Vec::new()
        }
    };

    TopicDefinition { name, description, keywords }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_taxonomy() {
        let content = r#"
topics:
  color_theory:
    name: Color Theory
    keywords:
      - palette
      - hue
  layout:
    keywords: [grid, whitespace]
classification:
  min_keyword_matches: 1
  max_topics_per_chunk: 2
"#;
        let taxonomy = parse_taxonomy(content).unwrap();
        assert_eq!(taxonomy.len(), 2);
        assert_eq!(taxonomy.topic_ids().collect::<Vec<_>>(), vec!["color_theory", "layout"]);

        let color = taxonomy.topic("color_theory").unwrap();
        assert_eq!(color.name.as_deref(), Some("Color Theory"));
        assert_eq!(color.keywords, vec!["palette", "hue"]);
        assert_eq!(taxonomy.settings().min_keyword_matches, 1);
        assert_eq!(taxonomy.settings().max_topics_per_chunk, 2);
    }

    #[test]
    fn missing_keywords_become_empty_sets() {
        let content = r#"
topics:
  no_list:
    name: Nothing here
  null_list:
    keywords:
  bad_list:
    keywords: "not a list"
  bare:
"#;
        let taxonomy = parse_taxonomy(content).unwrap();
        assert_eq!(taxonomy.len(), 4);
        for (_, topic) in taxonomy.topics() {
            assert!(topic.keywords.is_empty());
        }
    }

    #[test]
    fn missing_settings_use_defaults() {
        let taxonomy = parse_taxonomy("topics:\n  a:\n    keywords: [x]\n").unwrap();
        assert_eq!(*taxonomy.settings(), ClassificationSettings::default());
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let taxonomy =
            parse_taxonomy("classification:\n  min_keyword_matches: 5\n").unwrap();
        assert_eq!(taxonomy.settings().min_keyword_matches, 5);
        assert_eq!(taxonomy.settings().max_topics_per_chunk, 3);
    }

    #[test]
    fn numeric_keywords_are_kept_as_text() {
        let taxonomy = parse_taxonomy("topics:\n  errors:\n    keywords: [404, timeout]\n").unwrap();
        assert_eq!(taxonomy.topic("errors").unwrap().keywords, vec!["404", "timeout"]);
    }

    #[test]
    fn empty_document_is_an_empty_taxonomy() {
        let taxonomy = parse_taxonomy("").unwrap();
        assert!(taxonomy.is_empty());
    }

    #[test]
    fn rejects_non_mapping_root() {
        let err = parse_taxonomy("- a\n- b\n").unwrap_err();
        assert!(matches!(err, TopicError::InvalidTaxonomy(_)));
    }

    #[test]
    fn loads_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("topic_taxonomy.yaml");
        fs::write(&path, "topics:\n  layout:\n    keywords: [grid]\n").unwrap();

        let taxonomy = load_taxonomy(&path).unwrap();
        assert_eq!(taxonomy.topic("layout").unwrap().keywords, vec!["grid"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_taxonomy("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, TopicError::Io { .. }));
    }
}
