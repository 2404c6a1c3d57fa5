use rand::Rng;

use crate::engine::PracticeError;
use crate::engine::diff;
use crate::engine::grading;
use crate::engine::pool::{SentenceEntry, SentencePool};
use crate::engine::sampler;
use crate::session::result::{GradeResult, SessionSummary};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingAttempt,
    Graded,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingAttempt => "awaiting an attempt",
            SessionState::Graded => "graded",
        }
    }
}

/// One practice interaction over a sentence pool.
///
/// The pool owns sentence identity and weights; the session only remembers
/// the index of the sentence under test.
pub struct PracticeSession {
    pool: SentencePool,
    state: SessionState,
    current: Option<usize>,
    last_attempt: Option<String>,
    last_result: Option<GradeResult>,
    summary: SessionSummary,
}

impl PracticeSession {
    pub fn new(pool: SentencePool) -> Self {
        Self {
            pool,
            state: SessionState::Idle,
            current: None,
            last_attempt: None,
            last_result: None,
            summary: SessionSummary::default(),
        }
    }

    /// Replace the pool with one built from `source`. On failure the
    /// session is left as it was.
    pub fn load_source(&mut self, source: &str) -> Result<usize, PracticeError> {
        let pool = SentencePool::rebuild(source)?;
        tracing::info!(sentences = pool.len(), "loaded new sentence source");
        *self = Self::new(pool);
        Ok(self.pool.len())
    }

    pub fn request_next<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<&SentenceEntry, PracticeError> {
        self.expect_state("request the next sentence", &[
            SessionState::Idle,
            SessionState::Graded,
        ])?;
        let index = sampler::sample(&mut self.pool, rng)?;
        self.current = Some(index);
        self.last_attempt = None;
        self.last_result = None;
        self.state = SessionState::AwaitingAttempt;
        self.current_entry()
    }

    pub fn submit(&mut self, attempt: &str) -> Result<&GradeResult, PracticeError> {
        self.expect_state("submit an attempt", &[SessionState::AwaitingAttempt])?;
        let index = self.current.ok_or(PracticeError::EmptyPool)?;
        let entry = self.pool.get(index).ok_or(PracticeError::EmptyPool)?;

        let grade = grading::grade(attempt, entry);
        // Diff what was graded, so ignored variants are never flagged.
        let runs = if grade.correct {
            None
        } else {
            let normalized = grading::normalize_attempt(attempt);
            Some(diff::highlight(&normalized, &entry.text))
        };
        let sentence = entry.text.clone();
        let stored = self.pool.set_weight(&sentence, grade.updated_weight)?;

        tracing::debug!(
            correct = grade.correct,
            weight = stored,
            edits = runs.as_deref().map_or(0, diff::edit_distance),
            diff = ?runs.as_deref().map(diff::render_marked),
            "graded attempt"
        );

        self.summary.record(&sentence, attempt, grade.correct);
        self.last_attempt = Some(attempt.to_string());
        self.state = SessionState::Graded;
        Ok(self.last_result.insert(GradeResult {
            correct: grade.correct,
            updated_weight: stored,
            diff: runs,
        }))
    }

    /// Present the same sentence again without resampling.
    pub fn retry_current(&mut self) -> Result<&SentenceEntry, PracticeError> {
        self.expect_state("retry", &[SessionState::Graded])?;
        self.last_result = None;
        self.state = SessionState::AwaitingAttempt;
        self.current_entry()
    }

    /// End the session: every weight goes back to 1.
    pub fn close(&mut self) {
        self.pool.reset_weights();
        self.current = None;
        self.last_attempt = None;
        self.last_result = None;
        self.summary.clear();
        self.state = SessionState::Idle;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current(&self) -> Option<&SentenceEntry> {
        self.current.and_then(|i| self.pool.get(i))
    }

    pub fn last_attempt(&self) -> Option<&str> {
        self.last_attempt.as_deref()
    }

    pub fn last_result(&self) -> Option<&GradeResult> {
        self.last_result.as_ref()
    }

    pub fn pool(&self) -> &SentencePool {
        &self.pool
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    fn current_entry(&self) -> Result<&SentenceEntry, PracticeError> {
        self.current().ok_or(PracticeError::EmptyPool)
    }

    fn expect_state(
        &self,
        action: &'static str,
        allowed: &[SessionState],
    ) -> Result<(), PracticeError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(PracticeError::InvalidTransition {
                action,
                state: self.state.as_str(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::engine::diff::DiffKind;

    fn session(source: &str) -> PracticeSession {
        PracticeSession::new(SentencePool::rebuild(source).unwrap())
    }

    #[test]
    fn test_new_session_is_idle() {
        let s = session("a. b");
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.current().is_none());
        assert_eq!(s.pool().len(), 2);
    }

    #[test]
    fn test_french_scenario() {
        let mut s = session("Je mange une pomme. Tu manges une poire!");
        let mut rng = StepRng::new(0, 0);

        let entry = s.request_next(&mut rng).unwrap();
        assert_eq!(entry.text, "Je mange une pomme");
        assert_eq!(entry.weight, 0.25);
        assert_eq!(s.state(), SessionState::AwaitingAttempt);

        let result = s.submit("Je mange une poire").unwrap().clone();
        assert!(!result.correct);
        assert_eq!(result.updated_weight, 1.0);
        let runs = result.diff.unwrap();
        assert_eq!(runs[0].kind, DiffKind::Equal);
        assert!(runs[0].text.starts_with("Je mange une "));
        assert!(runs.iter().any(|r| r.kind == DiffKind::Removed));
        assert!(runs.iter().any(|r| r.kind == DiffKind::Added));

        assert_eq!(s.state(), SessionState::Graded);
        assert_eq!(s.pool().weight_of("Je mange une pomme"), Some(1.0));
        assert_eq!(s.last_attempt(), Some("Je mange une poire"));
    }

    #[test]
    fn test_diff_ignores_folded_apostrophe_and_question_mark() {
        let mut s = session("I'm ready");
        let mut rng = StepRng::new(0, 0);
        s.request_next(&mut rng).unwrap();

        let result = s.submit("I\u{2019}m reddy?").unwrap();
        assert!(!result.correct);
        let runs = result.diff.as_deref().unwrap();
        let removed: Vec<&str> = runs
            .iter()
            .filter(|r| r.kind == DiffKind::Removed)
            .map(|r| r.text.as_str())
            .collect();
        assert_eq!(removed, vec!["d"]);
        assert_eq!(diff::render_marked(runs), "I'm re[-d-]{+a+}dy");
        // The raw attempt is kept for display
        assert_eq!(s.last_attempt(), Some("I\u{2019}m reddy?"));
    }

    #[test]
    fn test_correct_submit_has_no_diff() {
        let mut s = session("Bonjour");
        let mut rng = SmallRng::seed_from_u64(1);
        s.request_next(&mut rng).unwrap();
        let result = s.submit("Bonjour").unwrap();
        assert!(result.correct);
        assert!(result.diff.is_none());
        // 1 / 4 on sampling, then / 4 on the correct answer
        assert_eq!(result.updated_weight, 1.0 / 16.0);
        assert_eq!(s.summary().correct_count(), 1);
    }

    #[test]
    fn test_submit_requires_awaiting_state() {
        let mut s = session("a");
        assert_eq!(
            s.submit("a").unwrap_err(),
            PracticeError::InvalidTransition {
                action: "submit an attempt",
                state: "idle",
            }
        );
    }

    #[test]
    fn test_request_next_rejected_while_awaiting() {
        let mut s = session("a");
        let mut rng = SmallRng::seed_from_u64(1);
        s.request_next(&mut rng).unwrap();
        assert!(matches!(
            s.request_next(&mut rng),
            Err(PracticeError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_request_next_on_empty_pool_stays_idle() {
        let mut s = PracticeSession::new(SentencePool::default());
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(s.request_next(&mut rng).unwrap_err(), PracticeError::EmptyPool);
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_retry_reuses_sentence_without_resampling() {
        let mut s = session("a. b. c");
        let mut rng = SmallRng::seed_from_u64(5);
        let first = s.request_next(&mut rng).unwrap().text.clone();
        s.submit("wrong").unwrap();
        let weights_before = s.pool().weights();

        let again = s.retry_current().unwrap();
        assert_eq!(again.text, first);
        assert_eq!(s.state(), SessionState::AwaitingAttempt);
        assert!(s.last_result().is_none());
        assert_eq!(s.pool().weights(), weights_before);
    }

    #[test]
    fn test_retry_only_from_graded() {
        let mut s = session("a");
        assert!(s.retry_current().is_err());
        let mut rng = SmallRng::seed_from_u64(1);
        s.request_next(&mut rng).unwrap();
        assert!(s.retry_current().is_err());
    }

    #[test]
    fn test_close_resets_weights_and_clears_current() {
        let mut s = session("a. b");
        let mut rng = SmallRng::seed_from_u64(2);
        s.request_next(&mut rng).unwrap();
        s.submit("nope").unwrap();
        s.close();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.current().is_none());
        assert!(s.last_result().is_none());
        assert_eq!(s.pool().weights(), vec![1.0, 1.0]);
        assert_eq!(s.summary().total(), 0);
    }

    #[test]
    fn test_close_is_valid_from_any_state() {
        let mut s = session("a");
        s.close();
        let mut rng = SmallRng::seed_from_u64(1);
        s.request_next(&mut rng).unwrap();
        s.close();
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_load_source_failure_keeps_session() {
        let mut s = session("a. b");
        let mut rng = SmallRng::seed_from_u64(1);
        s.request_next(&mut rng).unwrap();
        assert_eq!(s.load_source(" . \n").unwrap_err(), PracticeError::EmptySource);
        assert_eq!(s.state(), SessionState::AwaitingAttempt);
        assert_eq!(s.pool().len(), 2);
    }

    #[test]
    fn test_load_source_replaces_pool_and_clears_current() {
        let mut s = session("a. b");
        let mut rng = SmallRng::seed_from_u64(1);
        s.request_next(&mut rng).unwrap();
        assert_eq!(s.load_source("x. y. z"), Ok(3));
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.current().is_none());
        assert_eq!(s.pool().weights(), vec![1.0, 1.0, 1.0]);
    }
}
