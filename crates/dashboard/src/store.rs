//! Persisted key/value seam and the highlight memory stored through it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Store key for the last created bracket's list id.
pub const HIGHLIGHT_LIST_ID_KEY: &str = "tradeworker.lastOcoOrderId";

/// Store key for the last created bracket's list-level client order id.
pub const HIGHLIGHT_LIST_CLIENT_ID_KEY: &str = "tradeworker.lastOcoClientOrderId";

/// Minimal string store injected into both the bracket workflow (writer)
/// and the open-order board (reader). Get/set are atomic at single-string
/// granularity; there is no transactional guarantee across keys.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// The two identifiers remembered across sessions for highlighting.
///
/// Both fields are written together on every successful submission so a
/// reader never sees a pairing assembled from two different submissions.
/// Nothing ever clears them except the next submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightMemory {
    pub list_id: Option<String>,
    pub list_client_order_id: Option<String>,
}

impl HighlightMemory {
    /// Read both fields from the store.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            list_id: store.get(HIGHLIGHT_LIST_ID_KEY),
            list_client_order_id: store.get(HIGHLIGHT_LIST_CLIENT_ID_KEY),
        }
    }

    /// Write both fields, overwriting prior values. A `None` field removes
    /// the stale key instead of leaving an old submission's value behind.
    pub fn store(&self, store: &dyn KeyValueStore) {
        match &self.list_id {
            Some(id) => store.set(HIGHLIGHT_LIST_ID_KEY, id),
            None => store.remove(HIGHLIGHT_LIST_ID_KEY),
        }
        match &self.list_client_order_id {
            Some(id) => store.set(HIGHLIGHT_LIST_CLIENT_ID_KEY, id),
            None => store.remove(HIGHLIGHT_LIST_CLIENT_ID_KEY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.list_id.is_none() && self.list_client_order_id.is_none()
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}

/// JSON-file-backed store surviving restarts. Write-through on every
/// mutation; a failed write is logged and the in-memory view stays
/// authoritative for the rest of the session.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open a store at `path`, loading existing entries if the file exists.
    /// An unreadable or corrupt file starts the store empty rather than
    /// failing the session.
    pub fn open(path: &Path) -> Self {
        let entries = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring corrupt store file");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        let raw = match serde_json::to_string_pretty(entries) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to serialize store");
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %e, "Failed to create store directory");
                return;
            }
        }

        if let Err(e) = std::fs::write(&self.path, raw) {
            warn!(path = %self.path.display(), error = %e, "Failed to write store file");
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}
