//! Logging and span export.
//!
//! ```text
//! tracing macros ─┬→ EnvFilter → fmt layer → stderr
//!                 └→ OpenTelemetryLayer → JsonLinesExporter → RotatingWriter → file
//! ```
//!
//! The export branch exists only when a `trace_file` is configured.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`exporter`]: JSON-lines `SpanExporter`
//! - [`file_writer`]: Size-rotated trace file

pub mod exporter;
pub mod file_writer;
pub mod init;

pub use init::init_tracing;
