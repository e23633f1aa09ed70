//! Core trait definition for question suppliers.
//!
//! A supplier produces the two ordered question collections (main and
//! buffer) a session is built from. Implementations live in the
//! `adaptest-suppliers` crate; the core never performs I/O itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::Question;

/// Difficulty band requested for the main subset.
pub const MAIN_DIFFICULTY_BAND: (f64, f64) = (0.3, 0.7);
/// Difficulty band requested for the buffer subset.
pub const BUFFER_DIFFICULTY_BAND: (f64, f64) = (0.1, 0.9);

/// Trait for backends that generate questions from study material.
#[async_trait]
pub trait QuestionSupplier: Send + Sync {
    /// Human-readable supplier name (e.g. "openrouter").
    fn name(&self) -> &str;

    /// Produce the main and buffer question collections.
    async fn supply(&self, request: &SupplyRequest) -> anyhow::Result<SupplyResponse>;
}

/// Request to generate questions from source material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyRequest {
    /// The study material, already extracted to plain text.
    pub source_text: String,
    /// Questions to generate for the main subset.
    pub main_count: usize,
    /// Questions to generate for the buffer subset.
    pub buffer_count: usize,
    /// Difficulty band for the main subset.
    pub main_difficulty: (f64, f64),
    /// Difficulty band for the buffer subset.
    pub buffer_difficulty: (f64, f64),
}

impl SupplyRequest {
    /// A standard 10 + 10 request over the given source text.
    pub fn for_text(source_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            main_count: 10,
            buffer_count: 10,
            main_difficulty: MAIN_DIFFICULTY_BAND,
            buffer_difficulty: BUFFER_DIFFICULTY_BAND,
        }
    }
}

/// The two ordered question collections a supplier delivers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyResponse {
    pub main: Vec<Question>,
    pub buffer: Vec<Question>,
}

impl SupplyResponse {
    pub fn combined_len(&self) -> usize {
        self.main.len() + self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_request_defaults() {
        let request = SupplyRequest::for_text("some material");
        assert_eq!(request.main_count, 10);
        assert_eq!(request.buffer_count, 10);
        assert_eq!(request.main_difficulty, MAIN_DIFFICULTY_BAND);
        assert_eq!(request.buffer_difficulty, BUFFER_DIFFICULTY_BAND);
    }
}
