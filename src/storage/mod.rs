//! Storage layer for durable client-side data.
//!
//! This module provides the local-storage abstraction and the per-user
//! favorites built on top of it.
//!
//! # Modules
//!
//! - `backend`: [`KeyValueStore`] trait implemented by every backend
//! - `json`: JSON file backend with atomic writes
//! - `memory`: in-memory backend
//! - `favorites`: per-user favorites keyed by email

pub mod backend;
pub mod favorites;
pub mod json;
pub mod memory;

pub use backend::KeyValueStore;
pub use favorites::{favorites_key, FavoritesStore};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
