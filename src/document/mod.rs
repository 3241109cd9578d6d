//! Parsed SVG element tree with stable node ids.

/// Selectors that target elements of a [`tree::Document`].
pub mod selector;
/// Element tree, style merging and serialization.
pub mod tree;
