use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PracticeError {
    #[error("source text contains no sentences")]
    EmptySource,
    #[error("sentence pool is empty")]
    EmptyPool,
    #[error("sentence is not in the pool: {0:?}")]
    UnknownSentence(String),
    #[error("cannot {action} while session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

impl PracticeError {
    /// True for the errors that just mean there is nothing loaded to practice.
    pub fn is_nothing_to_practice(&self) -> bool {
        matches!(self, PracticeError::EmptySource | PracticeError::EmptyPool)
    }
}
