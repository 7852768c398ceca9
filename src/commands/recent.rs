//! Recently executed commands
//!
//! The list is stored as a JSON array of command ids under `recentCommands`
//! in the injected key-value store, most recent first.

use log::debug;

use crate::error::{Error, Result, ResultExt};
use crate::storage::KeyValueStore;

/// Store key holding the recent-commands list
pub const RECENT_COMMANDS_KEY: &str = "recentCommands";

/// Default number of ids kept
pub const DEFAULT_MAX_RECENT: usize = 5;

/// A de-duplicated, length-capped, most-recent-first list of command ids.
///
/// Nothing is cached: the store is read on every query and written on every
/// push. Store failures read as an empty list and skip the write.
pub struct RecentCommands {
    store: Box<dyn KeyValueStore>,
    max: usize,
}

impl RecentCommands {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            max: DEFAULT_MAX_RECENT,
        }
    }

    /// Cap the list at `max` ids (at least one).
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = max.max(1);
        self
    }

    /// The stored ids, most recent first.
    pub fn ids(&self) -> Vec<String> {
        let mut ids = self
            .read()
            .unwrap_or_warn_default(Vec::new(), "Failed to read recent commands");
        ids.truncate(self.max);
        ids
    }

    /// Move `id` to the front, dropping any earlier occurrence.
    pub fn push(&self, id: &str) {
        let mut ids = self.ids();
        ids.retain(|existing| existing != id);
        ids.insert(0, id.to_string());
        ids.truncate(self.max);

        self.write(&ids)
            .unwrap_or_warn_default((), "Failed to record recent command");
    }

    fn read(&self) -> Result<Vec<String>> {
        match self.store.get(RECENT_COMMANDS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| Error::StorageRead {
                key: RECENT_COMMANDS_KEY.to_string(),
                source: Box::new(e),
            }),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, ids: &[String]) -> Result<()> {
        let json = serde_json::to_string(ids)?;
        self.store.set(RECENT_COMMANDS_KEY, &json)?;
        debug!("Recent commands: {:?}", ids);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::BrokenStore;
    use crate::storage::MemoryStore;
    use std::rc::Rc;

    /// Lets a test inspect the store after handing it to `RecentCommands`.
    struct SharedStore(Rc<MemoryStore>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.0.set(key, value)
        }
    }

    #[test]
    fn test_empty_store() {
        let recent = RecentCommands::new(Box::new(MemoryStore::new()));
        assert!(recent.ids().is_empty());
    }

    #[test]
    fn test_most_recent_first_and_dedup() {
        let recent = RecentCommands::new(Box::new(MemoryStore::new()));
        recent.push("x");
        recent.push("y");
        recent.push("x");
        assert_eq!(recent.ids(), vec!["x", "y"]);
    }

    #[test]
    fn test_capped_at_max() {
        let recent = RecentCommands::new(Box::new(MemoryStore::new()));
        for id in ["a", "b", "c", "d", "e", "f", "g"] {
            recent.push(id);
        }
        assert_eq!(recent.ids(), vec!["g", "f", "e", "d", "c"]);

        let short = RecentCommands::new(Box::new(MemoryStore::new())).with_max(0);
        assert_eq!(short.max, 1);
    }

    #[test]
    fn test_persisted_as_json_array() {
        let shared = Rc::new(MemoryStore::new());
        let recent = RecentCommands::new(Box::new(SharedStore(Rc::clone(&shared))));
        recent.push("bold");
        recent.push("italic");

        assert_eq!(
            shared.get(RECENT_COMMANDS_KEY).unwrap().as_deref(),
            Some(r#"["italic","bold"]"#)
        );
    }

    #[test]
    fn test_corrupted_value_reads_as_empty() {
        let store = MemoryStore::new();
        store.set(RECENT_COMMANDS_KEY, "not json").unwrap();
        let recent = RecentCommands::new(Box::new(store));
        assert!(recent.ids().is_empty());

        // The next push overwrites the bad value
        recent.push("bold");
        assert_eq!(recent.ids(), vec!["bold"]);
    }

    #[test]
    fn test_broken_store_degrades() {
        let recent = RecentCommands::new(Box::new(BrokenStore));
        recent.push("bold");
        assert!(recent.ids().is_empty());
    }
}
