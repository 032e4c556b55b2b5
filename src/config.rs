use web_sys::Element;

use crate::error::ConfigError;
use crate::grading::UnmatchedPolicy;

pub const DEFAULT_IMAGE: &str = "image";
pub const DEFAULT_QUESTION: &str = "question";
pub const DEFAULT_ANSWER_SET: &str = "default";
pub const DEFAULT_SOURCE: &str = "tags.json";

/// Host element tag that widgets are mounted into.
pub const HOST_TAG: &str = "tagging-question";

/// Settings for one widget, read from its host element.
#[derive(Clone, PartialEq, Debug)]
pub struct WidgetConfig {
    pub image: String,
    pub question: String,
    pub answer_set: String,
    /// URL of the answer key document.
    pub source: String,
    pub unmatched: UnmatchedPolicy,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.into(),
            question: DEFAULT_QUESTION.into(),
            answer_set: DEFAULT_ANSWER_SET.into(),
            source: DEFAULT_SOURCE.into(),
            unmatched: UnmatchedPolicy::default(),
        }
    }
}

impl WidgetConfig {
    /// Build a config from attribute lookups. Missing attributes fall back
    /// to defaults; present-but-empty ones for the answer set or source are
    /// rejected.
    pub fn from_attributes<F>(attr: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let answer_set = attr("answer-set").unwrap_or(defaults.answer_set);
        if answer_set.trim().is_empty() {
            return Err(ConfigError::EmptyAnswerSet);
        }

        let source = attr("src").unwrap_or(defaults.source);
        if source.trim().is_empty() {
            return Err(ConfigError::EmptySource);
        }

        let unmatched = match attr("unmatched") {
            None => defaults.unmatched,
            Some(value) => parse_policy(&value)?,
        };

        Ok(Self {
            image: attr("image").unwrap_or(defaults.image),
            question: attr("question").unwrap_or(defaults.question),
            answer_set: answer_set.trim().to_string(),
            source: source.trim().to_string(),
            unmatched,
        })
    }

    pub fn from_element(element: &Element) -> Result<Self, ConfigError> {
        Self::from_attributes(|name| element.get_attribute(name))
    }
}

fn parse_policy(value: &str) -> Result<UnmatchedPolicy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "incorrect" => Ok(UnmatchedPolicy::MarkIncorrect),
        "omit" => Ok(UnmatchedPolicy::Omit),
        other => Err(ConfigError::UnknownUnmatchedPolicy(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<WidgetConfig, ConfigError> {
        let attrs: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WidgetConfig::from_attributes(|name| attrs.get(name).cloned())
    }

    #[test]
    fn missing_attributes_use_defaults() {
        assert_eq!(config_from(&[]).unwrap(), WidgetConfig::default());
    }

    #[test]
    fn reads_every_attribute() {
        let config = config_from(&[
            ("image", "img/cat.jpg"),
            ("question", "Tag this picture"),
            ("answer-set", " animals "),
            ("src", "data/tags.json"),
            ("unmatched", "Omit"),
        ])
        .unwrap();
        assert_eq!(config.image, "img/cat.jpg");
        assert_eq!(config.question, "Tag this picture");
        assert_eq!(config.answer_set, "animals");
        assert_eq!(config.source, "data/tags.json");
        assert_eq!(config.unmatched, UnmatchedPolicy::Omit);
    }

    #[test]
    fn rejects_empty_answer_set() {
        assert_eq!(
            config_from(&[("answer-set", "  ")]).unwrap_err(),
            ConfigError::EmptyAnswerSet
        );
    }

    #[test]
    fn rejects_empty_source() {
        assert_eq!(config_from(&[("src", "")]).unwrap_err(), ConfigError::EmptySource);
    }

    #[test]
    fn rejects_unknown_policy() {
        assert_eq!(
            config_from(&[("unmatched", "skip")]).unwrap_err(),
            ConfigError::UnknownUnmatchedPolicy("skip".into())
        );
    }

    #[test]
    fn blank_policy_means_incorrect() {
        let config = config_from(&[("unmatched", "")]).unwrap();
        assert_eq!(config.unmatched, UnmatchedPolicy::MarkIncorrect);
    }
}
