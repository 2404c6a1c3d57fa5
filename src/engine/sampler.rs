use rand::Rng;

use crate::engine::error::PracticeError;
use crate::engine::pool::SentencePool;

/// Applied to the selected entry on every draw, before any grading.
pub const SELECTION_DECAY: f64 = 4.0;

/// Cumulative-weight inversion: index of the first entry whose running sum
/// reaches `threshold`. Overrun from float rounding lands on the last entry.
pub fn select_index(weights: &[f64], threshold: f64) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let mut cursor = 0.0;
    for (i, weight) in weights.iter().enumerate() {
        cursor += weight;
        if cursor >= threshold {
            return Some(i);
        }
    }
    Some(weights.len() - 1)
}

/// Pick one sentence with probability proportional to its weight and
/// quarter its weight. Returns the index of the selected entry.
pub fn sample<R: Rng + ?Sized>(pool: &mut SentencePool, rng: &mut R) -> Result<usize, PracticeError> {
    if pool.is_empty() {
        return Err(PracticeError::EmptyPool);
    }

    let weights = pool.weights();
    let total = pool.total_weight();
    let roll: f64 = rng.gen_range(0.0..1.0);
    let threshold = roll * total;
    let index = select_index(&weights, threshold).ok_or(PracticeError::EmptyPool)?;

    let decayed = pool.set_weight_at(index, weights[index] / SELECTION_DECAY);
    tracing::debug!(index, threshold, total, weight = decayed, "sampled sentence");
    Ok(index)
}
