//! Supply intake: the boundary between a supplier and a session.
//!
//! A supplier's output is only usable once it clears the soft minimum of
//! combined questions; short deliveries are then padded up to the target
//! count with low-difficulty filler questions so a session always has a
//! full pool to draw from.

use std::collections::BTreeMap;

use adaptest_core::model::Question;
use adaptest_core::pool::{QuestionPool, SOFT_MIN_QUESTIONS, TARGET_QUESTIONS};
use adaptest_core::traits::SupplyResponse;

use crate::error::SupplierError;

const FILLER_DIFFICULTY: f64 = 0.3;
const FILLER_TOPIC: &str = "General";

/// Validate a supply delivery and build the session pool from it.
///
/// Fails if fewer than [`SOFT_MIN_QUESTIONS`] combined questions were
/// delivered; otherwise pads the buffer subset with filler questions up to
/// [`TARGET_QUESTIONS`] combined, or trims an oversized delivery down to
/// the same target (main subset first, so trimming only affects the
/// buffer tail).
pub fn finalize_supply(response: SupplyResponse) -> Result<QuestionPool, SupplierError> {
    let combined = response.combined_len();
    if combined < SOFT_MIN_QUESTIONS {
        return Err(SupplierError::InsufficientQuestions {
            got: combined,
            minimum: SOFT_MIN_QUESTIONS,
        });
    }

    let SupplyResponse { main, mut buffer } = response;
    if combined < TARGET_QUESTIONS {
        tracing::info!(
            delivered = combined,
            target = TARGET_QUESTIONS,
            "padding short delivery with filler questions"
        );
        for number in combined + 1..=TARGET_QUESTIONS {
            buffer.push(filler_question(number)?);
        }
    } else if combined > TARGET_QUESTIONS {
        buffer.truncate(TARGET_QUESTIONS.saturating_sub(main.len()));
    }

    Ok(QuestionPool::new(main, buffer))
}

/// A neutral low-difficulty review question used to pad short deliveries.
/// The correct answer is fixed to the first option label.
fn filler_question(number: usize) -> Result<Question, SupplierError> {
    let options: BTreeMap<String, String> = [
        ("A".to_string(), "Option A".to_string()),
        ("B".to_string(), "Option B".to_string()),
        ("C".to_string(), "Option C".to_string()),
        ("D".to_string(), "Option D".to_string()),
    ]
    .into_iter()
    .collect();

    let answer = options.keys().next().cloned().unwrap_or_default();

    Ok(Question::new(
        format!("Review question {number}"),
        options,
        answer,
        FILLER_DIFFICULTY,
        "This is a review question.",
        FILLER_TOPIC,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(difficulty: f64, n: usize) -> Question {
        let options: BTreeMap<String, String> = [
            ("A".to_string(), "first".to_string()),
            ("B".to_string(), "second".to_string()),
        ]
        .into_iter()
        .collect();
        Question::new(format!("generated question {n}"), options, "A", difficulty, "", "Topic")
            .unwrap()
    }

    fn response(main_count: usize, buffer_count: usize) -> SupplyResponse {
        SupplyResponse {
            main: (0..main_count).map(|n| question(0.5, n)).collect(),
            buffer: (0..buffer_count).map(|n| question(0.4, 100 + n)).collect(),
        }
    }

    #[test]
    fn rejects_below_soft_minimum() {
        let err = finalize_supply(response(10, 4)).unwrap_err();
        assert!(matches!(
            err,
            SupplierError::InsufficientQuestions { got: 14, minimum: 15 }
        ));
        assert!(err.is_permanent());
    }

    #[test]
    fn pads_short_delivery_to_target() {
        let pool = finalize_supply(response(10, 5)).unwrap();
        assert_eq!(pool.len(), 20);
        assert_eq!(pool.main_len(), 10);
        assert_eq!(pool.buffer_len(), 10);

        // Fillers go after the genuinely generated buffer questions.
        let filler = pool.get(15).unwrap();
        assert_eq!(filler.prompt(), "Review question 16");
        assert!((filler.difficulty() - 0.3).abs() < 1e-12);
        assert_eq!(filler.topic(), "General");
        assert_eq!(filler.answer(), "A");
    }

    #[test]
    fn full_delivery_is_untouched() {
        let pool = finalize_supply(response(10, 10)).unwrap();
        assert_eq!(pool.len(), 20);
        assert_eq!(pool.get(19).unwrap().prompt(), "generated question 109");
    }

    #[test]
    fn oversized_delivery_is_trimmed_from_the_buffer_tail() {
        let pool = finalize_supply(response(12, 10)).unwrap();
        assert_eq!(pool.len(), 20);
        assert_eq!(pool.main_len(), 12);
        assert_eq!(pool.buffer_len(), 8);
    }
}
