//! Frame rendering: override computation, serialization and rasterization.

/// Per-frame overrides and the frame renderer.
pub mod frame;
/// Raster buffers and rasterization surfaces.
pub mod surface;
pub mod transform;
