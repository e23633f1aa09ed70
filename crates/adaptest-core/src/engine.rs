//! Adaptive session engine.
//!
//! One [`AdaptiveEngine`] instance owns the state of one test attempt:
//! ability and target-difficulty estimates, scoring counters, the set of
//! presented pool indices, and the per-answer history. Concurrent sessions
//! are simply independent engine instances; there is no shared state.
//!
//! All operations are synchronous, in-memory computations. The caller is
//! expected to serialize calls into one engine instance.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::Question;
use crate::pool::QuestionPool;
use crate::report::SessionReport;

const ABILITY_START: f64 = 0.5;
const ABILITY_MIN: f64 = 0.1;
const ABILITY_MAX: f64 = 0.9;
const TARGET_START: f64 = 0.5;
const TARGET_MIN: f64 = 0.1;
const TARGET_MAX: f64 = 0.9;
const FAST_ABILITY_GAIN: f64 = 0.1;
const SLOW_ABILITY_GAIN: f64 = 0.05;
const WRONG_ABILITY_PENALTY: f64 = 0.08;
const TARGET_STEP_UP: f64 = 0.05;
const TARGET_STEP_DOWN: f64 = 0.1;

/// Configuration for an adaptive session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed session length in questions.
    pub max_questions: usize,
    /// Base points for a correct answer before the difficulty multiplier.
    pub base_points: u32,
    /// Answers faster than this earn the larger ability gain.
    pub fast_answer_secs: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_questions: 10,
            base_points: 10,
            fast_answer_secs: 10.0,
        }
    }
}

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Completed,
}

/// A question handed out by [`AdaptiveEngine::next_question`].
///
/// Carries the pool index so the answer can be traced back to its source
/// question without any re-derivation.
#[derive(Debug, Clone)]
pub struct SelectedQuestion {
    /// Combined pool index of the question.
    pub index: usize,
    pub question: Question,
}

/// One entry of the session history, appended per processed answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// 1-based position within the session.
    pub sequence: usize,
    /// Combined pool index of the answered question.
    pub question_index: usize,
    /// Topic of the answered question.
    pub topic: String,
    pub is_correct: bool,
    pub time_taken_secs: f64,
    pub difficulty: f64,
    pub points_earned: u32,
    pub multiplier: f64,
    /// Ability estimate after this answer was applied.
    pub ability_after: f64,
}

/// The per-answer outcome returned to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub points_earned: u32,
    pub time_taken_secs: f64,
    pub multiplier: f64,
    /// Target difficulty after the update.
    pub target_difficulty: f64,
    /// Ability estimate after the update.
    pub ability: f64,
    pub attempted: usize,
    pub total_points: u32,
}

/// The adaptive scoring engine: owns one session's state machine.
pub struct AdaptiveEngine {
    pool: QuestionPool,
    config: EngineConfig,
    ability: f64,
    target_difficulty: f64,
    attempted: usize,
    correct: usize,
    total_points: u32,
    used: HashSet<usize>,
    history: Vec<AnswerRecord>,
}

impl AdaptiveEngine {
    /// Start a session over `pool` with the default configuration.
    pub fn new(pool: QuestionPool) -> Self {
        Self::with_config(pool, EngineConfig::default())
    }

    pub fn with_config(pool: QuestionPool, config: EngineConfig) -> Self {
        Self {
            pool,
            config,
            ability: ABILITY_START,
            target_difficulty: TARGET_START,
            attempted: 0,
            correct: 0,
            total_points: 0,
            used: HashSet::new(),
            history: Vec::new(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.attempted >= self.config.max_questions || self.used.len() >= self.pool.len() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        }
    }

    pub fn ability(&self) -> f64 {
        self.ability
    }

    pub fn target_difficulty(&self) -> f64 {
        self.target_difficulty
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn total_points(&self) -> u32 {
        self.total_points
    }

    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    pub fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Select the next question to present, or `None` when the session is
    /// over (question budget spent or pool exhausted). A `None` here is the
    /// signal to move to results.
    pub fn next_question(&mut self) -> Option<SelectedQuestion> {
        if self.attempted >= self.config.max_questions {
            return None;
        }
        let (index, question) = self
            .pool
            .select_next(self.target_difficulty, &mut self.used)?;
        Some(SelectedQuestion {
            index,
            question: question.clone(),
        })
    }

    /// Score one answer and update the session state.
    ///
    /// `selected` must be the value handed out by the matching
    /// [`next_question`](Self::next_question) call; its pool index and topic
    /// are recorded in the history so reporting never has to guess which
    /// question an answer belonged to.
    pub fn process_answer(
        &mut self,
        selected: &SelectedQuestion,
        is_correct: bool,
        time_taken_secs: f64,
    ) -> AnswerOutcome {
        self.attempted += 1;

        let difficulty = selected.question.difficulty();
        let multiplier = 1.0 + (difficulty - 0.5);

        let points_earned = if is_correct {
            self.correct += 1;
            let points = (f64::from(self.config.base_points) * multiplier).floor() as u32;
            self.total_points += points;

            let gain = if time_taken_secs < self.config.fast_answer_secs {
                FAST_ABILITY_GAIN
            } else {
                SLOW_ABILITY_GAIN
            };
            self.ability = (self.ability + gain).min(ABILITY_MAX);
            self.target_difficulty = (self.target_difficulty + TARGET_STEP_UP).min(TARGET_MAX);
            points
        } else {
            self.ability = (self.ability - WRONG_ABILITY_PENALTY).max(ABILITY_MIN);
            self.target_difficulty = (self.target_difficulty - TARGET_STEP_DOWN).max(TARGET_MIN);
            0
        };

        self.history.push(AnswerRecord {
            sequence: self.attempted,
            question_index: selected.index,
            topic: selected.question.topic().to_string(),
            is_correct,
            time_taken_secs,
            difficulty,
            points_earned,
            multiplier,
            ability_after: self.ability,
        });

        AnswerOutcome {
            is_correct,
            points_earned,
            time_taken_secs,
            multiplier,
            target_difficulty: self.target_difficulty,
            ability: self.ability,
            attempted: self.attempted,
            total_points: self.total_points,
        }
    }

    /// Aggregate the session into a report, or `None` if nothing was
    /// attempted yet.
    pub fn final_report(&self) -> Option<SessionReport> {
        if self.attempted == 0 {
            return None;
        }
        Some(SessionReport::compute(
            &self.history,
            self.attempted,
            self.correct,
            self.total_points,
            self.ability,
        ))
    }

    /// Reinitialize the session state. The question pool is preserved
    /// unchanged, so the same questions can be retaken.
    pub fn reset(&mut self) {
        self.ability = ABILITY_START;
        self.target_difficulty = TARGET_START;
        self.attempted = 0;
        self.correct = 0;
        self.total_points = 0;
        self.used.clear();
        self.history.clear();
    }
}
