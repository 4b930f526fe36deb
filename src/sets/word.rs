use serde::{Deserialize, Deserializer, Serialize};

/// A single flashcard: the hint is shown, any of `answers` is accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: String,
    pub hint: String,
    #[serde(alias = "answer", deserialize_with = "one_or_many")]
    pub answers: Vec<String>,
    #[serde(default)]
    pub progress_counter: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_set_id: Option<String>,
}

impl Word {
    pub fn new(id: impl Into<String>, hint: impl Into<String>, answers: &[&str]) -> Self {
        Self {
            id: id.into(),
            hint: hint.into(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
            progress_counter: 0,
            origin_set_id: None,
        }
    }

    pub fn with_counter(mut self, counter: u32) -> Self {
        self.progress_counter = counter;
        self
    }

    /// Answers joined for display, e.g. in corrective feedback.
    pub fn answer_text(&self) -> String {
        self.answers.join(", ")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// A named collection of words. Sessions treat it as an immutable snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl WordSet {
    pub fn new(id: impl Into<String>, name: impl Into<String>, words: Vec<Word>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            words,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_accepts_single_string() {
        let word: Word = serde_json::from_str(r#"{"id":"w1","hint":"cat","answer":"кіт"}"#).unwrap();
        assert_eq!(word.answers, vec!["кіт".to_string()]);
        assert_eq!(word.progress_counter, 0);
        assert!(word.origin_set_id.is_none());
    }

    #[test]
    fn test_answers_accept_list() {
        let word: Word =
            serde_json::from_str(r#"{"id":"w1","hint":"cat","answers":["кіт","котик"]}"#).unwrap();
        assert_eq!(word.answers.len(), 2);
        assert_eq!(word.answer_text(), "кіт, котик");
    }
}
