//! Durable key-value storage abstraction.
//!
//! This module defines the [`KeyValueStore`] trait, the narrow interface every
//! persistence backend implements. Business logic (see
//! [`FavoritesStore`](crate::storage::FavoritesStore)) only ever talks to this
//! trait, so the backend can move from a JSON file to an embedded database
//! without touching it.
//!
//! # Design Philosophy
//!
//! The trait mirrors browser local storage: string keys, string values, whole
//! values replaced on every write. Values are opaque to the store; encoding
//! and decoding belong to the caller.

use crate::domain::error::Result;

/// Abstraction over a durable string key-value space.
///
/// Implementations must persist a `set` or `remove` before returning, so a
/// value read back after a successful write is always the value written.
///
/// # Implementations
///
/// - [`JsonFileStore`](crate::storage::JsonFileStore): single JSON file with atomic writes
/// - [`MemoryStore`](crate::storage::MemoryStore): process-local map, for tests and private sessions
///
/// # Examples
///
/// ```
/// use cinemaguide::storage::{KeyValueStore, MemoryStore};
///
/// let mut store = MemoryStore::default();
/// store.set("favorites_a@b.c", "[]")?;
/// assert_eq!(store.get("favorites_a@b.c")?.as_deref(), Some("[]"));
/// # Ok::<(), cinemaguide::CinemaError>(())
/// ```
pub trait KeyValueStore: Send {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion cannot be persisted.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
