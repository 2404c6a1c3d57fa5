use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// External text-to-speech program; `None` means sentences are shown instead.
    #[serde(default)]
    pub speech_command: Option<String>,
    #[serde(default)]
    pub speech_args: Vec<String>,
    #[serde(default = "default_reveal_sentence")]
    pub reveal_sentence: bool,
    #[serde(default = "default_restore_source")]
    pub restore_source: bool,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_reveal_sentence() -> bool {
    false
}
fn default_restore_source() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            speech_command: None,
            speech_args: Vec::new(),
            reveal_sentence: default_reveal_sentence(),
            restore_source: default_restore_source(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load `path`, writing the defaults there first if it does not exist
    /// so there is a file to edit.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            if let Err(err) = config.save_to(path) {
                tracing::warn!(%err, path = %path.display(), "could not write default config");
            }
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recite")
            .join("config.toml")
    }

    /// The speech command, ignoring blank values left in the file.
    pub fn speech_program(&self) -> Option<&str> {
        self.speech_command
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Without audio the learner has to see the sentence to practice it.
    pub fn should_reveal(&self) -> bool {
        self.reveal_sentence || self.speech_program().is_none()
    }
}
