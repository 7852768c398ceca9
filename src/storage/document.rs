//! The working document, persisted through a key-value store.

use super::KeyValueStore;
use crate::error::ResultExt;

/// Store key holding the current document text
pub const DOCUMENT_KEY: &str = "markdown-content";

/// Loads and saves the single working document.
///
/// Storage failures never reach the editor: a failed load yields an empty
/// document and a failed save is logged and skipped.
pub struct DocumentStore {
    store: Box<dyn KeyValueStore>,
}

impl DocumentStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The saved document, or an empty string.
    pub fn load(&self) -> String {
        self.store
            .get(DOCUMENT_KEY)
            .unwrap_or_warn_default(None, "Failed to load document")
            .unwrap_or_default()
    }

    /// Save `text`, returning whether the write succeeded.
    pub fn save(&self, text: &str) -> bool {
        self.store
            .set(DOCUMENT_KEY, text)
            .map(|()| true)
            .unwrap_or_warn_default(false, "Failed to save document")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
