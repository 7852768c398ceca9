//! JSON-file-backed key-value store
//!
//! All keys live in one JSON object at `<config dir>/marknote/storage.json`.
//! The file is re-read on every `get` and rewritten atomically (temp file +
//! rename) on every `set`.

use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::config::get_config_dir;
use crate::error::{Error, Result};

/// Storage file name inside the config directory
const STORAGE_FILE_NAME: &str = "storage.json";

/// Temporary file used during atomic writes
const STORAGE_TEMP_NAME: &str = "storage.json.tmp";

/// A key-value store persisted as a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open a store backed by the file at `path`. The file need not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the store in the platform config directory.
    pub fn in_config_dir() -> Result<Self> {
        Ok(Self::new(get_config_dir()?.join(STORAGE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self, key: &str) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| Error::StorageRead {
            key: key.to_string(),
            source: Box::new(e),
        })?;

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| Error::StorageRead {
            key: key.to_string(),
            source: Box::new(e),
        })
    }

    fn write_all(&self, key: &str, values: &BTreeMap<String, String>) -> Result<()> {
        let write_err = |e: Box<dyn std::error::Error + Send + Sync>| Error::StorageWrite {
            key: key.to_string(),
            source: e,
        };

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| write_err(Box::new(e)))?;
            }
        }

        let json = serde_json::to_string_pretty(values).map_err(|e| write_err(Box::new(e)))?;
        let temp_path = self.path.with_file_name(STORAGE_TEMP_NAME);

        fs::write(&temp_path, json).map_err(|e| write_err(Box::new(e)))?;
        fs::rename(&temp_path, &self.path).map_err(|e| write_err(Box::new(e)))?;

        debug!("Wrote '{}' to {}", key, self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all(key)?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.read_all(key)?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(key, &values)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path().join("storage.json"));
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path().join("nested").join("storage.json"));

        store.set("recentCommands", r#"["bold"]"#).unwrap();
        store.set("markdown-content", "# Hi").unwrap();

        assert_eq!(
            store.get("recentCommands").unwrap().as_deref(),
            Some(r#"["bold"]"#)
        );
        assert_eq!(store.get("markdown-content").unwrap().as_deref(), Some("# Hi"));
        assert!(!dir.path().join("nested").join(STORAGE_TEMP_NAME).exists());
    }

    #[test]
    fn test_two_handles_share_the_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("storage.json");
        let a = FileStore::new(&path);
        let b = FileStore::new(&path);

        a.set("k", "from a").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("from a"));
    }

    #[test]
    fn test_corrupted_file_is_read_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("storage.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get("k"), Err(Error::StorageRead { .. })));
        assert!(store.set("k", "v").is_err());
    }

    #[test]
    fn test_empty_file_reads_as_empty() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("storage.json");
        fs::write(&path, "").unwrap();
        assert_eq!(FileStore::new(&path).get("k").unwrap(), None);
    }
}
