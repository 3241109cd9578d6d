//! Timeline sampling and per-descriptor progress.

/// Descriptor-local progress with direction and fill semantics.
pub mod progress;
/// Frame sequencing and frame rate heuristics.
pub mod sequence;
