//! Core data model types for adaptest.
//!
//! A [`Question`] is immutable once built and can only be built through
//! [`Question::new`], which enforces the record invariants. Serde goes
//! through the [`RawQuestion`] wire form, so deserialized questions pass
//! through the same validation as hand-constructed ones.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::QuestionError;

/// The serde wire form of a question, shared by TOML question banks and
/// supplier JSON payloads. Converting it into a [`Question`] validates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawQuestion {
    /// The question text shown to the learner.
    pub prompt: String,
    /// Label of the correct option.
    pub answer: String,
    /// Difficulty in [0.0, 1.0].
    pub difficulty: f64,
    /// Shown to the learner after answering.
    #[serde(default)]
    pub explanation: String,
    /// Topic label used for weak-topic reporting.
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Option label → option text. Labels are unique by construction.
    pub options: BTreeMap<String, String>,
}

fn default_topic() -> String {
    "General".to_string()
}

/// A single multiple-choice question.
///
/// Invariants (enforced by [`Question::new`]):
/// - the correct label is a key of the option map
/// - there are at least two options
/// - difficulty lies in [0.0, 1.0]
/// - the prompt is non-empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion", into = "RawQuestion")]
pub struct Question {
    prompt: String,
    options: BTreeMap<String, String>,
    answer: String,
    difficulty: f64,
    explanation: String,
    topic: String,
}

impl Question {
    /// Build a question, validating the record invariants.
    pub fn new(
        prompt: impl Into<String>,
        options: BTreeMap<String, String>,
        answer: impl Into<String>,
        difficulty: f64,
        explanation: impl Into<String>,
        topic: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let answer = answer.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions(options.len()));
        }
        if !options.contains_key(&answer) {
            return Err(QuestionError::UnknownCorrectLabel(answer));
        }
        if !(0.0..=1.0).contains(&difficulty) {
            return Err(QuestionError::DifficultyOutOfRange(difficulty));
        }

        Ok(Self {
            prompt,
            options,
            answer,
            difficulty,
            explanation: explanation.into(),
            topic: topic.into(),
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Option label → option text, in stable label order.
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// Label of the correct option.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Whether the given option label is the correct answer.
    pub fn is_correct_choice(&self, label: &str) -> bool {
        self.answer == label
    }
}

impl TryFrom<RawQuestion> for Question {
    type Error = QuestionError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        Question::new(
            raw.prompt,
            raw.options,
            raw.answer,
            raw.difficulty,
            raw.explanation,
            raw.topic,
        )
    }
}

impl From<Question> for RawQuestion {
    fn from(q: Question) -> Self {
        RawQuestion {
            prompt: q.prompt,
            options: q.options,
            answer: q.answer,
            difficulty: q.difficulty,
            explanation: q.explanation,
            topic: q.topic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_options() -> BTreeMap<String, String> {
        [
            ("A".to_string(), "mitochondria".to_string()),
            ("B".to_string(), "nucleus".to_string()),
            ("C".to_string(), "ribosome".to_string()),
            ("D".to_string(), "membrane".to_string()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn valid_construction() {
        let q = Question::new(
            "Which organelle produces ATP?",
            four_options(),
            "A",
            0.4,
            "Mitochondria are the powerhouse of the cell.",
            "Cell Biology",
        )
        .unwrap();
        assert_eq!(q.answer(), "A");
        assert!(q.is_correct_choice("A"));
        assert!(!q.is_correct_choice("B"));
        assert_eq!(q.topic(), "Cell Biology");
    }

    #[test]
    fn rejects_unknown_correct_label() {
        let err = Question::new("prompt", four_options(), "E", 0.5, "", "General").unwrap_err();
        assert!(matches!(err, QuestionError::UnknownCorrectLabel(ref l) if l == "E"));
    }

    #[test]
    fn rejects_out_of_range_difficulty() {
        let err = Question::new("prompt", four_options(), "A", 1.3, "", "General").unwrap_err();
        assert!(matches!(err, QuestionError::DifficultyOutOfRange(_)));
        let err = Question::new("prompt", four_options(), "A", -0.1, "", "General").unwrap_err();
        assert!(matches!(err, QuestionError::DifficultyOutOfRange(_)));
    }

    #[test]
    fn rejects_too_few_options() {
        let one: BTreeMap<String, String> = [("A".to_string(), "only".to_string())]
            .into_iter()
            .collect();
        let err = Question::new("prompt", one, "A", 0.5, "", "General").unwrap_err();
        assert!(matches!(err, QuestionError::TooFewOptions(1)));
    }

    #[test]
    fn rejects_empty_prompt() {
        let err = Question::new("   ", four_options(), "A", 0.5, "", "General").unwrap_err();
        assert!(matches!(err, QuestionError::EmptyPrompt));
    }

    #[test]
    fn deserialization_goes_through_validation() {
        let json = r#"{
            "prompt": "Which organelle produces ATP?",
            "options": {"A": "mitochondria", "B": "nucleus"},
            "answer": "Z",
            "difficulty": 0.4
        }"#;
        let result: Result<Question, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn serde_roundtrip_defaults() {
        let json = r#"{
            "prompt": "Which organelle produces ATP?",
            "options": {"A": "mitochondria", "B": "nucleus"},
            "answer": "A",
            "difficulty": 0.4
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.topic(), "General");
        assert_eq!(q.explanation(), "");

        let serialized = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&serialized).unwrap();
        assert_eq!(back, q);
    }
}
