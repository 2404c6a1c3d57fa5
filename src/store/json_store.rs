use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::SourceData;

const SOURCE_FILE: &str = "source.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(data_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing, unreadable and unparsable files all come back as `None`.
    fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let content = fs::read_to_string(self.file_path(name)).ok()?;
        match serde_json::from_str(&content) {
            Ok(data) => Some(data),
            Err(err) => {
                tracing::warn!(file = name, %err, "ignoring unreadable store file");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_source(&self) -> Option<SourceData> {
        self.load::<SourceData>(SOURCE_FILE)
            .filter(|data| !data.needs_reset())
    }

    pub fn save_source(&self, text: &str) -> Result<()> {
        self.save(SOURCE_FILE, &SourceData::new(text))
    }

    pub fn clear_source(&self) -> Result<()> {
        let path = self.file_path(SOURCE_FILE);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Per-user data directory, shared with the log file.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recite")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::SCHEMA_VERSION;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_empty_store_has_no_source() {
        let (_dir, store) = make_test_store();
        assert!(store.load_source().is_none());
    }

    #[test]
    fn test_save_then_load_source() {
        let (_dir, store) = make_test_store();
        store.save_source("Je mange une pomme.\nTu manges une poire!").unwrap();
        let data = store.load_source().unwrap();
        assert_eq!(data.text, "Je mange une pomme.\nTu manges une poire!");
        assert_eq!(data.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (dir, store) = make_test_store();
        store.save_source("a").unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
    }

    #[test]
    fn test_corrupt_file_is_treated_as_absent() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(SOURCE_FILE), "{ not json").unwrap();
        assert!(store.load_source().is_none());
    }

    #[test]
    fn test_stale_schema_is_treated_as_absent() {
        let (_dir, store) = make_test_store();
        let json = r#"{"schema_version": 999, "text": "a", "saved_at": "2024-01-01T00:00:00Z"}"#;
        fs::write(store.file_path(SOURCE_FILE), json).unwrap();
        assert!(store.load_source().is_none());
    }

    #[test]
    fn test_clear_source() {
        let (_dir, store) = make_test_store();
        store.save_source("a").unwrap();
        store.clear_source().unwrap();
        assert!(store.load_source().is_none());
        // Clearing twice is fine
        store.clear_source().unwrap();
    }
}
