use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::diff::DiffRun;

/// Outcome of one submitted attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct GradeResult {
    pub correct: bool,
    pub updated_weight: f64,
    /// Only present when the attempt was wrong.
    pub diff: Option<Vec<DiffRun>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub sentence: String,
    pub attempt: String,
    pub correct: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct SessionSummary {
    pub attempts: Vec<AttemptRecord>,
    pub streak: u32,
    pub best_streak: u32,
}

impl SessionSummary {
    pub fn record(&mut self, sentence: &str, attempt: &str, correct: bool) {
        self.attempts.push(AttemptRecord {
            sentence: sentence.to_string(),
            attempt: attempt.to_string(),
            correct,
            timestamp: Utc::now(),
        });
        if correct {
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }
    }

    pub fn total(&self) -> usize {
        self.attempts.len()
    }

    pub fn correct_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.correct).count()
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 100.0;
        }
        self.correct_count() as f64 / total as f64 * 100.0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
