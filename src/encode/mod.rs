//! GIF encoding.
//!
//! Sinks consume rendered frames in timeline order; `GifSink` quantizes and writes them on
//! `end`.

/// Host capability probing for the quantization pool.
pub mod capabilities;
/// Encoder settings.
pub mod config;
pub mod dither;
/// Palette quantization and GIF container writing.
pub mod gif;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
