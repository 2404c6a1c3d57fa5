use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    /// Bracketed paste; sentence lists usually arrive this way.
    Paste(String),
    Tick,
    Resize,
}

impl AppEvent {
    /// Map a raw terminal event, dropping key releases and repeats.
    fn from_terminal(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Paste(text) => Some(AppEvent::Paste(text)),
            Event::Resize(_, _) => Some(AppEvent::Resize),
            _ => None,
        }
    }
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let next = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(ev) => AppEvent::from_terminal(ev),
                        Err(_) => None,
                    }
                } else {
                    Some(AppEvent::Tick)
                };
                if let Some(ev) = next {
                    if tx.send(ev).is_err() {
                        return;
                    }
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    use super::*;

    fn key(kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_only_key_presses_pass_through() {
        assert!(matches!(
            AppEvent::from_terminal(key(KeyEventKind::Press)),
            Some(AppEvent::Key(_))
        ));
        assert!(AppEvent::from_terminal(key(KeyEventKind::Release)).is_none());
        assert!(AppEvent::from_terminal(key(KeyEventKind::Repeat)).is_none());
    }

    #[test]
    fn test_paste_and_resize() {
        assert!(matches!(
            AppEvent::from_terminal(Event::Paste("a. b".to_string())),
            Some(AppEvent::Paste(text)) if text == "a. b"
        ));
        assert!(matches!(
            AppEvent::from_terminal(Event::Resize(80, 24)),
            Some(AppEvent::Resize)
        ));
        assert!(AppEvent::from_terminal(Event::FocusGained).is_none());
    }
}
