//! OpenTelemetry-based observability with file-based trace export.
//!
//! Spans recorded with `tracing` are bridged into OpenTelemetry and written
//! as OTLP JSON lines to a file in the data directory, for offline analysis:
//!
//! ```text
//! tracing → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → cinemaguide-otlp.json
//! ```
//!
//! The file rotates at 10 MB and keeps three backups.
//!
//! # Modules
//!
//! - `init`: subscriber setup
//! - `exporter`: rotating file and span exporter
//! - `otlp`: OTLP JSON encoding

mod exporter;
mod init;
mod otlp;

pub use init::{init_tracing, SERVICE_NAME};
