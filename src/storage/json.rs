//! JSON file-based key-value store.
//!
//! Persists the whole key space in one human-readable JSON file. Every write
//! goes to a temporary file that is then renamed over the target, so the file
//! on disk is always a complete document even if the process dies mid-write.
//!
//! The file is the only copy of the data. Every read loads it again and every
//! write loads it, changes a single key and writes it back, so several handles
//! on the same path see each other's writes.
//!
//! A file that does not parse is renamed to `<file>.corrupt` and the store
//! starts over empty.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(n), parses the entire file
//! - **Write**: O(n), parses and rewrites the entire file
//! - **Best for**: small key spaces with infrequent writes (per-user favorites)

use crate::domain::error::{CinemaError, Result};
use crate::storage::backend::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// Current container format version.
const FORMAT_VERSION: u32 = 1;

/// Distinguishes temporary files of concurrent writers within one process.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// On-disk container format.
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "favorites_anna@example.com": "[{\"id\":42,\"title\":\"Batman\"}]"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    version: u32,

    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file key-value store.
///
/// Holds no state besides the file path. Mutations reach the disk before the
/// mutating call returns.
///
/// # Thread Safety
///
/// Handles on the same file never lose each other's keys as long as their
/// writes do not interleave; wrap shared use in a mutex. Two processes
/// writing at the same instant still race, and the last rename wins.
#[derive(Debug)]
pub struct JsonFileStore {
    file_path: PathBuf,
}

impl JsonFileStore {
    /// Opens the store at `file_path`, creating parent directories as needed.
    ///
    /// A missing file starts an empty store; nothing is written until the
    /// first mutation. A file that is not a valid store document is moved
    /// aside to `<file>.corrupt`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but cannot be read
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cinemaguide::storage::{JsonFileStore, KeyValueStore};
    ///
    /// let mut store = JsonFileStore::open("/tmp/cinemaguide/local-storage.json")?;
    /// store.set("greeting", "hello")?;
    /// # Ok::<(), cinemaguide::CinemaError>(())
    /// ```
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let file_path = file_path.into();
        tracing::debug!(path = ?file_path, "opening JSON key-value store");

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = Self { file_path };
        let data = store.read_data()?;
        tracing::debug!(entry_count = data.entries.len(), "store opened");

        Ok(store)
    }

    fn corrupt_path(&self) -> PathBuf {
        let mut name = self.file_path.as_os_str().to_os_string();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    /// Loads the current document. Absent or unparsable files read as empty.
    fn read_data(&self) -> Result<StoreData> {
        let contents = match std::fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::trace!("store file absent, reading as empty");
                return Ok(StoreData::default());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<StoreData>(&contents) {
            Ok(data) => {
                if data.version != FORMAT_VERSION {
                    tracing::warn!(version = data.version, "unexpected store version, reading as-is");
                }
                Ok(data)
            }
            Err(e) => {
                let aside = self.corrupt_path();
                tracing::warn!(
                    path = ?self.file_path,
                    moved_to = ?aside,
                    error = %e,
                    "store file does not parse, starting empty"
                );
                if let Err(e) = std::fs::rename(&self.file_path, &aside) {
                    tracing::warn!(error = %e, "failed to move corrupt store file aside");
                }
                Ok(StoreData::default())
            }
        }
    }

    /// Writes the whole key space to a temporary file and renames it into place.
    fn save_to_file(&self, data: &StoreData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| CinemaError::Storage(format!("failed to serialize store: {e}")))?;

        let mut tmp_name = self.file_path.as_os_str().to_os_string();
        tmp_name.push(format!(
            ".{}.{}.tmp",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let tmp_path = PathBuf::from(tmp_name);

        tracing::trace!(tmp_path = ?tmp_path, "writing temporary store file");
        if let Err(e) = std::fs::write(&tmp_path, json) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        if let Err(e) = std::fs::rename(&tmp_path, &self.file_path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::debug!(entry_count = data.entries.len(), "store saved");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_data()?.entries.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_store_set", key = %key, len = value.len()).entered();

        let mut data = self.read_data()?;
        data.entries.insert(key.to_string(), value.to_string());
        self.save_to_file(&data)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_store_remove", key = %key).entered();

        let mut data = self.read_data()?;
        if data.entries.remove(key).is_none() {
            return Ok(());
        }
        self.save_to_file(&data)
    }
}
