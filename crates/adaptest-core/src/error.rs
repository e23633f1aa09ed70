//! Question validation errors.
//!
//! A `Question` can only be built through its validated constructor, so
//! every malformed record is rejected at the boundary with one of these
//! variants instead of surfacing later as a scoring anomaly.

use thiserror::Error;

/// Errors raised when constructing a [`crate::model::Question`].
#[derive(Debug, Error)]
pub enum QuestionError {
    /// The correct-answer label is not a key of the option map.
    #[error("correct answer '{0}' is not one of the option labels")]
    UnknownCorrectLabel(String),

    /// A multiple-choice question needs at least two options.
    #[error("question has {0} option(s), need at least 2")]
    TooFewOptions(usize),

    /// Difficulty must stay within the unit interval.
    #[error("difficulty {0} is outside the 0.0..=1.0 range")]
    DifficultyOutOfRange(f64),

    /// The prompt text is empty or whitespace.
    #[error("question prompt is empty")]
    EmptyPrompt,
}
