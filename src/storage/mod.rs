//! Key-value persistence for Marknote
//!
//! Small pieces of runtime state (the recent-commands list, the working
//! document) live in a string key-value store that is handed to the
//! components needing it, instead of being reached through a global.
//!
//! - `file.rs` - JSON-file-backed store in the config directory
//! - `document.rs` - the working document on top of any store

mod document;
mod file;

pub use document::DocumentStore;
pub use file::FileStore;

use crate::error::Result;
use std::cell::RefCell;
use std::collections::HashMap;

/// A string key-value store.
///
/// Both operations take `&self`; stores are read at query time and written
/// at mutation time, so there is no in-memory state to keep coherent.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if it was never set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// An in-process store, used when nothing should outlive the session.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Error;
    use std::io;

    /// A store whose every operation fails, for degradation tests.
    pub(crate) struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Err(Error::StorageRead {
                key: key.to_string(),
                source: Box::new(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            })
        }

        fn set(&self, key: &str, _value: &str) -> Result<()> {
            Err(Error::StorageWrite {
                key: key.to_string(),
                source: Box::new(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            })
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_broken_store_reports_key() {
        let err = BrokenStore.get("recentCommands").unwrap_err();
        assert!(err.to_string().contains("recentCommands"));
    }
}
