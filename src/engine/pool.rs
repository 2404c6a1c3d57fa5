use std::collections::HashMap;

use icu_normalizer::ComposingNormalizerBorrowed;

use crate::engine::error::PracticeError;

/// Weight every sentence starts with after a rebuild or reset.
pub const INITIAL_WEIGHT: f64 = 1.0;
/// Repeated correct answers divide by 4 each time; stop before underflow.
pub const MIN_WEIGHT: f64 = 1e-9;
/// Repeated misses multiply by 4 each time; keep the total sum finite.
pub const MAX_WEIGHT: f64 = 1e9;

const SENTENCE_DELIMITERS: &[char] = &['.', '?', '!', '\n', '\r'];

/// Apostrophe look-alikes that keyboards and word processors emit.
const TYPOGRAPHIC_APOSTROPHES: &[char] = &[
    '\u{2019}', // ’ right single quotation mark
    '\u{2018}', // ‘ left single quotation mark
    '\u{02bc}', // ʼ modifier letter apostrophe
    '\u{2032}', // ′ prime
    '\u{ff07}', // ＇ fullwidth apostrophe
];

#[derive(Clone, Debug, PartialEq)]
pub struct SentenceEntry {
    pub text: String,
    pub weight: f64,
}

/// The deduplicated, weighted set of sentences for one practice session.
///
/// Entries keep insertion order so that weighted sampling is reproducible
/// under a seeded random source.
#[derive(Clone, Debug, Default)]
pub struct SentencePool {
    entries: Vec<SentenceEntry>,
    index: HashMap<String, usize>,
}

/// Trim a fragment, fold typographic apostrophes to `'` and apply NFC.
pub fn normalize_sentence(raw: &str) -> String {
    let folded: String = raw
        .trim()
        .chars()
        .map(|ch| {
            if TYPOGRAPHIC_APOSTROPHES.contains(&ch) {
                '\''
            } else {
                ch
            }
        })
        .collect();
    ComposingNormalizerBorrowed::new_nfc()
        .normalize(&folded)
        .into_owned()
}

fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        return MIN_WEIGHT;
    }
    weight.clamp(MIN_WEIGHT, MAX_WEIGHT)
}

impl SentencePool {
    /// Split `source` into sentences and build a fresh pool with every weight at 1.
    pub fn rebuild(source: &str) -> Result<Self, PracticeError> {
        let mut pool = SentencePool::default();

        for fragment in source.split(SENTENCE_DELIMITERS) {
            let text = normalize_sentence(fragment);
            if text.is_empty() {
                continue;
            }
            match pool.index.get(&text) {
                // Last write wins; the entry keeps its first position.
                Some(&i) => pool.entries[i].weight = INITIAL_WEIGHT,
                None => {
                    pool.index.insert(text.clone(), pool.entries.len());
                    pool.entries.push(SentenceEntry {
                        text,
                        weight: INITIAL_WEIGHT,
                    });
                }
            }
        }

        if pool.entries.is_empty() {
            return Err(PracticeError::EmptySource);
        }

        Ok(pool)
    }

    pub fn reset_weights(&mut self) {
        for entry in &mut self.entries {
            entry.weight = INITIAL_WEIGHT;
        }
    }

    /// Overwrite the weight of `text`, clamped to `[MIN_WEIGHT, MAX_WEIGHT]`.
    /// Returns the weight actually stored.
    pub fn set_weight(&mut self, text: &str, weight: f64) -> Result<f64, PracticeError> {
        let i = self
            .position(text)
            .ok_or_else(|| PracticeError::UnknownSentence(text.to_string()))?;
        Ok(self.set_weight_at(i, weight))
    }

    pub(crate) fn set_weight_at(&mut self, index: usize, weight: f64) -> f64 {
        let stored = clamp_weight(weight);
        self.entries[index].weight = stored;
        stored
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SentenceEntry> {
        self.entries.get(index)
    }

    pub fn position(&self, text: &str) -> Option<usize> {
        self.index.get(text).copied()
    }

    pub fn weight_of(&self, text: &str) -> Option<f64> {
        self.position(text).map(|i| self.entries[i].weight)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SentenceEntry> {
        self.entries.iter()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.weight).collect()
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }
}
