//! End-to-end pipeline tests over the library seam.
//!
//! These tests verify that the full pipeline (supply → intake → adaptive
//! session → report) holds together, using the mock supplier instead of a
//! real generation backend.

use adaptest_core::engine::{AdaptiveEngine, EngineConfig};
use adaptest_core::pool::QuestionPool;
use adaptest_core::traits::{QuestionSupplier, SupplyRequest};
use adaptest_suppliers::intake::finalize_supply;
use adaptest_suppliers::mock::MockSupplier;
use adaptest_suppliers::SupplierError;

async fn pool_from_mock(main: usize, buffer: usize) -> Result<QuestionPool, SupplierError> {
    let supplier = MockSupplier::with_generated(main, buffer);
    let response = supplier
        .supply(&SupplyRequest::for_text("study notes"))
        .await
        .unwrap();
    finalize_supply(response)
}

#[tokio::test]
async fn e2e_full_delivery_session() {
    let pool = pool_from_mock(10, 10).await.unwrap();
    assert_eq!(pool.len(), 20);

    let mut engine = AdaptiveEngine::new(pool);
    while let Some(selected) = engine.next_question() {
        let correct = selected.question.is_correct_choice("A");
        engine.process_answer(&selected, correct, 3.0);
    }

    // Placeholder questions are all answered by "A".
    assert_eq!(engine.attempted(), 10);
    assert_eq!(engine.correct(), 10);
    assert!((engine.ability() - 0.9).abs() < 1e-12);

    let report = engine.final_report().expect("session had answers");
    assert_eq!(report.attempted, 10);
    assert!((report.accuracy_pct - 100.0).abs() < 1e-9);
    assert!(report.weak_topics.is_empty());
    assert!(report.total_points > 0);
}

#[tokio::test]
async fn e2e_short_delivery_is_padded_and_playable() {
    let pool = pool_from_mock(8, 8).await.unwrap();
    assert_eq!(pool.len(), 20);

    // The padding landed in the buffer subset with the fixed filler shape.
    let filler = pool.get(19).unwrap();
    assert!((filler.difficulty() - 0.3).abs() < 1e-12);
    assert_eq!(filler.topic(), "General");
    assert_eq!(filler.answer(), "A");

    // A padded pool still supports a full-length session.
    let mut engine = AdaptiveEngine::new(pool);
    let mut answered = 0;
    while let Some(selected) = engine.next_question() {
        engine.process_answer(&selected, answered % 2 == 0, 6.0);
        answered += 1;
    }
    assert_eq!(answered, 10);
}

#[tokio::test]
async fn e2e_below_minimum_delivery_never_builds_a_pool() {
    let err = pool_from_mock(7, 7).await.unwrap_err();
    assert!(matches!(
        err,
        SupplierError::InsufficientQuestions { got: 14, minimum: 15 }
    ));
    assert!(err.is_permanent());
}

#[tokio::test]
async fn e2e_wrong_answers_drive_selection_easier() {
    let pool = pool_from_mock(10, 10).await.unwrap();
    let mut engine = AdaptiveEngine::new(pool);

    let first = engine.next_question().unwrap();
    let first_difficulty = first.question.difficulty();
    engine.process_answer(&first, false, 4.0);

    for _ in 0..4 {
        let selected = engine.next_question().unwrap();
        engine.process_answer(&selected, false, 4.0);
    }

    // Target drops by 0.1 per miss and is floored at 0.1; selection follows.
    assert!((engine.target_difficulty() - 0.1).abs() < 1e-9);
    let next = engine.next_question().unwrap();
    assert!(next.question.difficulty() <= first_difficulty);
    assert!((engine.ability() - 0.1).abs() < 1e-9);
}

#[tokio::test]
async fn e2e_reset_allows_a_retake_over_the_same_pool() {
    let pool = pool_from_mock(10, 10).await.unwrap();
    let mut engine = AdaptiveEngine::with_config(
        pool,
        EngineConfig {
            max_questions: 5,
            ..EngineConfig::default()
        },
    );

    while let Some(selected) = engine.next_question() {
        engine.process_answer(&selected, true, 2.0);
    }
    let first_report = engine.final_report().unwrap();
    assert_eq!(first_report.attempted, 5);

    engine.reset();
    assert!(engine.final_report().is_none());

    while let Some(selected) = engine.next_question() {
        engine.process_answer(&selected, true, 2.0);
    }
    let second_report = engine.final_report().unwrap();
    assert_eq!(second_report.attempted, 5);
    assert_eq!(second_report.total_points, first_report.total_points);
}
