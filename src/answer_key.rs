use std::collections::{HashMap, HashSet};

use gloo_net::http::Request;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::error::LoadError;

/// Correctness and feedback for a single tag, as stored in the answer key.
#[derive(Clone, PartialEq, Debug)]
pub struct TagAnswerEntry {
    pub tag: String,
    pub correct: bool,
    pub feedback: String,
}

/// One named set of options plus the verdicts used to grade them.
#[derive(Clone, PartialEq, Debug)]
pub struct AnswerSet {
    pub name: String,
    /// Option strings in document order, duplicates removed.
    pub options: Vec<String>,
    answers: HashMap<String, TagAnswerEntry>,
    /// Options that appeared more than once in the document.
    pub duplicate_options: Vec<String>,
}

impl AnswerSet {
    pub fn new(name: impl Into<String>, options: Vec<String>, answers: Vec<TagAnswerEntry>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(options.len());
        let mut duplicate_options = Vec::new();
        for option in options {
            if seen.insert(option.clone()) {
                unique.push(option);
            } else {
                duplicate_options.push(option);
            }
        }

        let mut by_tag = HashMap::with_capacity(answers.len());
        for entry in answers {
            by_tag.entry(entry.tag.clone()).or_insert(entry);
        }

        Self {
            name: name.into(),
            options: unique,
            answers: by_tag,
            duplicate_options,
        }
    }

    pub fn answer_for(&self, tag: &str) -> Option<&TagAnswerEntry> {
        self.answers.get(tag)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnswerSet {
    #[serde(default)]
    tag_options: Vec<String>,
    #[serde(default)]
    tag_answers: Vec<HashMap<String, RawVerdict>>,
}

#[derive(Deserialize)]
struct RawVerdict {
    #[serde(default)]
    correct: bool,
    #[serde(default)]
    feedback: String,
}

/// The whole answer key document, keyed by answer set name. Sets stay as
/// raw JSON until one is taken, so a malformed sibling set does not block
/// loading the requested one.
#[derive(Debug, Default)]
pub struct AnswerKey {
    sets: serde_json::Map<String, serde_json::Value>,
}

impl AnswerKey {
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let sets = serde_json::from_str(text)?;
        Ok(Self { sets })
    }

    pub fn take_set(mut self, name: &str) -> Result<AnswerSet, LoadError> {
        let value = self
            .sets
            .remove(name)
            .ok_or_else(|| LoadError::MissingAnswerSet(name.to_string()))?;
        let raw: RawAnswerSet = serde_json::from_value(value)?;
        let answers = raw
            .tag_answers
            .into_iter()
            .flat_map(|answer| answer.into_iter())
            .map(|(tag, verdict)| TagAnswerEntry {
                tag,
                correct: verdict.correct,
                feedback: verdict.feedback,
            })
            .collect();
        Ok(AnswerSet::new(name, raw.tag_options, answers))
    }
}

/// Fetch the answer key at `url` and pull out the set called `name`.
pub async fn fetch_answer_set(url: &str, name: &str) -> Result<AnswerSet, LoadError> {
    let resp = Request::get(url).send().await?;
    if !resp.ok() {
        return Err(LoadError::Status(resp.status()));
    }
    let text = resp.text().await?;
    AnswerKey::from_json(&text)?.take_set(name)
}

/// Uniform in-place Fisher-Yates shuffle.
pub fn shuffle_tags<R: Rng + ?Sized>(tags: &mut [String], rng: &mut R) {
    tags.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const CAT_DOG: &str = r#"{
        "default": {
            "tagOptions": ["cat", "dog"],
            "tagAnswers": [
                { "cat": { "correct": true, "feedback": "yes" } },
                { "dog": { "correct": false, "feedback": "no" } }
            ]
        },
        "other": { "tagOptions": ["red"] }
    }"#;

    #[test]
    fn parses_options_and_answers() {
        let set = AnswerKey::from_json(CAT_DOG)
            .unwrap()
            .take_set("default")
            .unwrap();
        assert_eq!(set.name, "default");
        assert_eq!(set.options, vec!["cat".to_string(), "dog".to_string()]);
        let cat = set.answer_for("cat").unwrap();
        assert!(cat.correct);
        assert_eq!(cat.feedback, "yes");
        let dog = set.answer_for("dog").unwrap();
        assert!(!dog.correct);
        assert_eq!(dog.feedback, "no");
        assert!(set.answer_for("bird").is_none());
    }

    #[test]
    fn missing_answers_default_to_empty() {
        let set = AnswerKey::from_json(CAT_DOG).unwrap().take_set("other").unwrap();
        assert_eq!(set.options, vec!["red".to_string()]);
        assert!(set.answer_for("red").is_none());
    }

    #[test]
    fn missing_set_is_an_error() {
        let err = AnswerKey::from_json(CAT_DOG)
            .unwrap()
            .take_set("nope")
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingAnswerSet(name) if name == "nope"));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = AnswerKey::from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn malformed_sibling_set_does_not_block_requested_set() {
        let text = r#"{
            "default": {
                "tagOptions": ["cat"],
                "tagAnswers": [{ "cat": { "correct": true, "feedback": "yes" } }]
            },
            "broken": { "tagOptions": "not-a-list" },
            "bad_verdict": { "tagAnswers": [{ "dog": { "correct": "maybe" } }] }
        }"#;
        let set = AnswerKey::from_json(text).unwrap().take_set("default").unwrap();
        assert_eq!(set.options, vec!["cat".to_string()]);
        assert!(set.answer_for("cat").unwrap().correct);
    }

    #[test]
    fn malformed_requested_set_is_a_parse_error() {
        let text = r#"{ "broken": { "tagOptions": "not-a-list" } }"#;
        let err = AnswerKey::from_json(text).unwrap().take_set("broken").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn duplicate_options_are_collapsed() {
        let set = AnswerSet::new(
            "dupes",
            vec!["a".into(), "b".into(), "a".into()],
            Vec::new(),
        );
        assert_eq!(set.options, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(set.duplicate_options, vec!["a".to_string()]);
    }

    #[test]
    fn first_answer_for_a_tag_wins() {
        let set = AnswerSet::new(
            "twice",
            vec!["a".into()],
            vec![
                TagAnswerEntry { tag: "a".into(), correct: true, feedback: "first".into() },
                TagAnswerEntry { tag: "a".into(), correct: false, feedback: "second".into() },
            ],
        );
        assert_eq!(set.answer_for("a").unwrap().feedback, "first");
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let original: Vec<String> = (0..20).map(|i| format!("tag{i}")).collect();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let mut tags = original.clone();
            shuffle_tags(&mut tags, &mut rng);
            assert_eq!(tags.len(), original.len());
            let mut sorted = tags.clone();
            sorted.sort();
            let mut expected = original.clone();
            expected.sort();
            assert_eq!(sorted, expected);
        }
    }
}
