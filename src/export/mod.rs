//! End-to-end export: options resolution and the staged pipeline.

/// Caller-facing options and their resolution.
pub mod options;
/// Staged exporter with progress reporting and cancellation.
pub mod pipeline;
