use rand::rngs::SmallRng;

use crate::config::Config;
use crate::engine::PracticeError;
use crate::engine::pool::SentencePool;
use crate::session::{PracticeSession, SessionState};
use crate::speech::Speaker;
use crate::store::json_store::JsonStore;
use crate::ui::text_input::TextInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    /// Editing the sentence list.
    Source,
    /// A sentence was played; waiting for the learner to type it.
    Practice,
    /// The last attempt has been graded.
    Feedback,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

pub struct App {
    pub screen: AppScreen,
    pub session: PracticeSession,
    pub config: Config,
    pub theme: Theme,
    pub source_input: TextInput,
    pub attempt_input: TextInput,
    pub reveal: bool,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
    speaker: Box<dyn Speaker>,
    store: Option<JsonStore>,
    rng: SmallRng,
}

impl App {
    pub fn new(
        config: Config,
        theme: Theme,
        speaker: Box<dyn Speaker>,
        store: Option<JsonStore>,
        rng: SmallRng,
        initial_source: Option<String>,
    ) -> Self {
        let restored = match initial_source {
            Some(text) => Some(text),
            None if config.restore_source => store
                .as_ref()
                .and_then(|s| s.load_source())
                .map(|data| data.text),
            None => None,
        };
        let reveal = config.should_reveal() || !speaker.is_audible();

        Self {
            screen: AppScreen::Source,
            session: PracticeSession::new(SentencePool::default()),
            config,
            theme,
            source_input: TextInput::multi_line(restored.as_deref().unwrap_or("")),
            attempt_input: TextInput::single_line(""),
            reveal,
            status: None,
            should_quit: false,
            speaker,
            store,
            rng,
        }
    }

    /// Build the pool from the editor contents and draw the first sentence.
    pub fn commit_source(&mut self) {
        let source = self.source_input.value().to_string();
        match self.session.load_source(&source) {
            Ok(count) => {
                if let Some(store) = &self.store {
                    if let Err(err) = store.save_source(&source) {
                        tracing::warn!(%err, "failed to save sentence source");
                    }
                }
                self.status = Some(StatusMessage::info(format!(
                    "Loaded {count} sentence{}",
                    if count == 1 { "" } else { "s" }
                )));
                self.next_sentence();
            }
            Err(err) => {
                // An emptied editor also forgets the saved source.
                if err == PracticeError::EmptySource {
                    if let Some(store) = &self.store {
                        if let Err(err) = store.clear_source() {
                            tracing::warn!(%err, "failed to clear saved source");
                        }
                    }
                }
                self.report(err);
            }
        }
    }

    pub fn next_sentence(&mut self) {
        let text = match self.session.request_next(&mut self.rng) {
            Ok(entry) => entry.text.clone(),
            Err(err) => return self.report(err),
        };
        self.attempt_input.clear();
        self.screen = AppScreen::Practice;
        self.speak(&text);
    }

    pub fn submit_attempt(&mut self) {
        let attempt = self.attempt_input.value().to_string();
        if attempt.trim().is_empty() {
            self.status = Some(StatusMessage::info("Type what you heard, then press Enter"));
            return;
        }
        match self.session.submit(&attempt) {
            Ok(result) => {
                let msg = if result.correct {
                    StatusMessage::info("Correct")
                } else {
                    StatusMessage::error("Not quite")
                };
                self.status = Some(msg);
                self.screen = AppScreen::Feedback;
            }
            Err(err) => self.report(err),
        }
    }

    pub fn retry(&mut self) {
        let text = match self.session.retry_current() {
            Ok(entry) => entry.text.clone(),
            Err(err) => return self.report(err),
        };
        self.attempt_input.clear();
        self.status = None;
        self.screen = AppScreen::Practice;
        self.speak(&text);
    }

    pub fn repeat_audio(&mut self) {
        if let Some(text) = self.session.current().map(|e| e.text.clone()) {
            self.speak(&text);
        }
    }

    pub fn toggle_reveal(&mut self) {
        // Nothing to hide when there is no audio.
        if self.speaker.is_audible() {
            self.reveal = !self.reveal;
        }
    }

    /// End the session: weights reset, back to the editor.
    pub fn close_session(&mut self) {
        self.speaker.cancel();
        self.session.close();
        self.attempt_input.clear();
        self.status = None;
        self.screen = AppScreen::Source;
    }

    pub fn handle_paste(&mut self, text: &str) {
        match self.screen {
            AppScreen::Source => self.source_input.insert_str(text),
            AppScreen::Practice => self.attempt_input.insert_str(text),
            AppScreen::Feedback => {}
        }
    }

    pub fn quit(&mut self) {
        self.speaker.cancel();
        self.should_quit = true;
    }

    pub fn sentence_count(&self) -> usize {
        if self.session.state() == SessionState::Idle && self.screen == AppScreen::Source {
            // Live count of what would be loaded from the editor.
            SentencePool::rebuild(self.source_input.value())
                .map(|p| p.len())
                .unwrap_or(0)
        } else {
            self.session.pool().len()
        }
    }

    fn speak(&mut self, text: &str) {
        if let Err(err) = self.speaker.play(text) {
            tracing::warn!(%err, "speech playback failed");
            self.status = Some(StatusMessage::error(format!("Speech failed: {err}")));
            self.reveal = true;
        }
    }

    fn report(&mut self, err: PracticeError) {
        if err.is_nothing_to_practice() {
            self.status = Some(StatusMessage::error(
                "Nothing to practice yet: enter at least one sentence",
            ));
        } else {
            tracing::error!(%err, "unexpected session transition");
            self.status = Some(StatusMessage::error(err.to_string()));
        }
    }
}
