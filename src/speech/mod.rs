use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result};

/// Plays a sentence aloud. Playback is fire-and-forget: `play` must not
/// wait for the utterance to finish.
pub trait Speaker {
    fn play(&mut self, text: &str) -> Result<()>;
    fn cancel(&mut self);
    /// Whether the learner actually hears anything.
    fn is_audible(&self) -> bool;
}

/// Used when no speech command is configured; the UI shows the text instead.
#[derive(Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn play(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn cancel(&mut self) {}

    fn is_audible(&self) -> bool {
        false
    }
}

/// Runs an external text-to-speech program (`espeak-ng`, `say`, ...) with
/// the sentence appended as the last argument.
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl CommandSpeaker {
    pub fn new(program: &str, args: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
            child: None,
        }
    }

    fn build_command(&self, text: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl Speaker for CommandSpeaker {
    fn play(&mut self, text: &str) -> Result<()> {
        // A new sentence interrupts whatever is still being spoken.
        self.cancel();
        let child = self
            .build_command(text)
            .spawn()
            .with_context(|| format!("failed to start speech command `{}`", self.program))?;
        tracing::debug!(program = %self.program, pid = child.id(), "speaking sentence");
        self.child = Some(child);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }

    fn is_audible(&self) -> bool {
        true
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Pick a speaker from configuration; an empty or missing command is silent.
pub fn from_config(command: Option<&str>, args: &[String]) -> Box<dyn Speaker> {
    match command.map(str::trim) {
        Some(program) if !program.is_empty() => Box::new(CommandSpeaker::new(program, args)),
        _ => Box::new(SilentSpeaker),
    }
}
