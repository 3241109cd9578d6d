//! Animation data model, easing curves and keyframe interpolation.

/// Keyframe interpolation across property kinds.
pub mod interpolate;
/// Descriptors, keyframes and their enumerations.
pub mod model;
/// Timing functions (named curves, cubic-bezier, steps).
pub mod timing;
