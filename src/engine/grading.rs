use crate::engine::pool::{SentenceEntry, normalize_sentence};

/// Correct answers divide the weight by this, misses multiply by it.
pub const FEEDBACK_FACTOR: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grade {
    pub correct: bool,
    pub updated_weight: f64,
}

/// Fold an attempt the same way the pool folds sentences, then drop a
/// single trailing question mark.
pub fn normalize_attempt(attempt: &str) -> String {
    let normalized = normalize_sentence(attempt);
    match normalized.strip_suffix('?') {
        Some(stripped) => stripped.trim_end().to_string(),
        None => normalized,
    }
}

/// Compare an attempt with the sentence under test. Pure: the caller writes
/// `updated_weight` back to the pool.
pub fn grade(attempt: &str, reference: &SentenceEntry) -> Grade {
    let correct = normalize_attempt(attempt) == reference.text;
    let updated_weight = if correct {
        reference.weight / FEEDBACK_FACTOR
    } else {
        reference.weight * FEEDBACK_FACTOR
    };
    Grade {
        correct,
        updated_weight,
    }
}
