//! Question pool management and next-question selection.
//!
//! A pool holds the main and buffer question subsets behind one combined
//! index space (main first, buffer second). Indices are stable for the
//! lifetime of the pool, so a session can track presented questions as a
//! plain index set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::Question;

/// Difficulty tolerance for the main-subset selection pass.
pub const MAIN_TOLERANCE: f64 = 0.2;
/// Difficulty tolerance for the buffer-subset fallback pass.
pub const BUFFER_TOLERANCE: f64 = 0.3;
/// Fewer combined questions than this is considered an unusable pool.
pub const SOFT_MIN_QUESTIONS: usize = 15;
/// Suppliers pad up to this many combined questions.
pub const TARGET_QUESTIONS: usize = 20;

/// The generated question set for one session: a main subset with medium
/// difficulty spread and a buffer subset used as fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionPool {
    main: Vec<Question>,
    buffer: Vec<Question>,
}

impl QuestionPool {
    pub fn new(main: Vec<Question>, buffer: Vec<Question>) -> Self {
        Self { main, buffer }
    }

    /// Combined question count.
    pub fn len(&self) -> usize {
        self.main.len() + self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.buffer.is_empty()
    }

    pub fn main_len(&self) -> usize {
        self.main.len()
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Question at a combined index (main first, buffer second).
    pub fn get(&self, index: usize) -> Option<&Question> {
        if index < self.main.len() {
            self.main.get(index)
        } else {
            self.buffer.get(index - self.main.len())
        }
    }

    /// Iterate over all questions in combined-index order.
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.main.iter().chain(self.buffer.iter())
    }

    /// Select the unused question closest to `target_difficulty`.
    ///
    /// Three widening passes, first non-empty candidate set wins:
    /// 1. main subset within [`MAIN_TOLERANCE`]
    /// 2. buffer subset within [`BUFFER_TOLERANCE`]
    /// 3. any unused question, no tolerance filter
    ///
    /// Ties break toward the earliest combined index. The winning index is
    /// inserted into `used`; nothing is marked when `None` is returned.
    pub fn select_next(
        &self,
        target_difficulty: f64,
        used: &mut HashSet<usize>,
    ) -> Option<(usize, &Question)> {
        if self.is_empty() || used.len() >= self.len() {
            return None;
        }

        let index = self
            .scan(0, self.main.len(), target_difficulty, MAIN_TOLERANCE, used)
            .or_else(|| {
                tracing::debug!(
                    target_difficulty,
                    "no main-subset candidate, widening to buffer"
                );
                self.scan(
                    self.main.len(),
                    self.len(),
                    target_difficulty,
                    BUFFER_TOLERANCE,
                    used,
                )
            })
            .or_else(|| {
                tracing::debug!(target_difficulty, "no buffered candidate, taking any unused");
                self.scan(0, self.len(), target_difficulty, f64::INFINITY, used)
            })?;

        used.insert(index);
        Some((index, self.question_at(index)))
    }

    /// Linear scan of `start..end`, returning the unused index within
    /// `tolerance` that minimizes difficulty distance to `target`.
    fn scan(
        &self,
        start: usize,
        end: usize,
        target: f64,
        tolerance: f64,
        used: &HashSet<usize>,
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for index in start..end {
            if used.contains(&index) {
                continue;
            }
            let distance = (self.question_at(index).difficulty() - target).abs();
            if distance > tolerance {
                continue;
            }
            // Strict comparison keeps the earliest index on equal distance.
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }

    fn question_at(&self, index: usize) -> &Question {
        if index < self.main.len() {
            &self.main[index]
        } else {
            &self.buffer[index - self.main.len()]
        }
    }
}
