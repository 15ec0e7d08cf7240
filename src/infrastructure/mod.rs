//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where the client keeps its durable files: the local-storage
//! document holding favorites and the trace export.

pub mod paths;

pub use paths::{data_dir, storage_file, trace_file};
