//! Session report with JSON persistence.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::AnswerRecord;

/// Final performance report for one completed (or abandoned) session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Points accumulated over the session.
    pub total_points: u32,
    /// Questions answered.
    pub attempted: usize,
    /// Questions answered correctly.
    pub correct: usize,
    /// correct / attempted, as a percentage.
    pub accuracy_pct: f64,
    /// Mean difficulty of the answered questions.
    pub avg_difficulty: f64,
    /// Fastest answer time in seconds.
    pub fastest_time_secs: f64,
    /// Slowest answer time in seconds.
    pub slowest_time_secs: f64,
    /// Ability estimate at the end of the session.
    pub final_ability: f64,
    /// Topics of incorrectly answered questions, deduplicated and sorted.
    pub weak_topics: Vec<String>,
    /// Full per-answer history.
    pub history: Vec<AnswerRecord>,
}

impl SessionReport {
    /// Aggregate a non-empty history into a report. Topics come straight
    /// from the history records; there is no re-derivation step.
    pub(crate) fn compute(
        history: &[AnswerRecord],
        attempted: usize,
        correct: usize,
        total_points: u32,
        final_ability: f64,
    ) -> Self {
        let accuracy_pct = correct as f64 / attempted as f64 * 100.0;
        let avg_difficulty =
            history.iter().map(|r| r.difficulty).sum::<f64>() / history.len() as f64;
        let fastest_time_secs = history
            .iter()
            .map(|r| r.time_taken_secs)
            .fold(f64::INFINITY, f64::min);
        let slowest_time_secs = history
            .iter()
            .map(|r| r.time_taken_secs)
            .fold(f64::NEG_INFINITY, f64::max);

        let weak_topics: Vec<String> = history
            .iter()
            .filter(|r| !r.is_correct)
            .map(|r| r.topic.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            total_points,
            attempted,
            correct,
            accuracy_pct,
            avg_difficulty,
            fastest_time_secs,
            slowest_time_secs,
            final_ability,
            weak_topics,
            history: history.to_vec(),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Score:** {} points | {}/{} correct ({:.1}%) | final ability {:.2}\n\n",
            self.total_points, self.correct, self.attempted, self.accuracy_pct, self.final_ability
        ));
        md.push_str(&format!(
            "Average difficulty {:.2}, fastest answer {:.1}s, slowest {:.1}s\n\n",
            self.avg_difficulty, self.fastest_time_secs, self.slowest_time_secs
        ));

        if !self.weak_topics.is_empty() {
            md.push_str("### Topics to review\n\n");
            for topic in &self.weak_topics {
                md.push_str(&format!("- {topic}\n"));
            }
            md.push('\n');
        }

        md.push_str("### History\n\n");
        md.push_str("| # | Topic | Difficulty | Correct | Time | Points |\n");
        md.push_str("|---|-------|------------|---------|------|--------|\n");
        for r in &self.history {
            md.push_str(&format!(
                "| {} | {} | {:.2} | {} | {:.1}s | {} |\n",
                r.sequence,
                r.topic,
                r.difficulty,
                if r.is_correct { "yes" } else { "no" },
                r.time_taken_secs,
                r.points_earned
            ));
        }

        md
    }
}
