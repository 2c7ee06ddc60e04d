//! Session-scoped form state persistence
//!
//! Partially-filled forms survive navigation through an external key-value
//! collaborator holding JSON snapshots, the way the host's session storage
//! does. The engine calls [`FormStateStore::save`] on every value change and
//! [`FormStateStore::load`] once at initialization; the store's lifetime and
//! eviction policy are the host's concern.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use strata_sector::FieldValue;

/// Snapshot of control values, keyed by control name
pub type FormSnapshot = BTreeMap<String, FieldValue>;

/// Scoped key-value store for serialized form snapshots
pub trait FormStateStore: Send + Sync {
    /// Persist the serialized snapshot under the key
    fn save(&self, key: &str, snapshot: &str);

    /// Load the serialized snapshot stored under the key, if any
    fn load(&self, key: &str) -> Option<String>;
}

/// In-memory store, used in tests and as a session-storage stand-in
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FormStateStore for MemoryStateStore {
    fn save(&self, key: &str, snapshot: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), snapshot.to_string());
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}
