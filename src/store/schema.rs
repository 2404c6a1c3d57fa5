use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// The last committed sentence source. Weights are session-scoped and
/// deliberately absent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceData {
    pub schema_version: u32,
    pub text: String,
    pub saved_at: DateTime<Utc>,
}

impl SourceData {
    pub fn new(text: &str) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            text: text.to_string(),
            saved_at: Utc::now(),
        }
    }

    /// Check if loaded data has a stale schema version.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}
