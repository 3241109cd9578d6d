//! svgif turns animated SVG documents into looping GIFs.
//!
//! Animations are read from embedded CSS (`@keyframes` + `animation`) and SMIL elements
//! (`<animate>`, `<animateTransform>`, `<animateMotion>`, `<set>`), sampled on a timeline, applied
//! to an element tree frame by frame, rasterized with `resvg` and quantized into a GIF.
//!
//! - [`export_gif`] for one-shot exports
//! - [`Exporter`] for progress reporting, cancellation and injected capabilities
//! - [`extract`](crate::extract::extract) and the lower-level modules for inspection
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod animation;
pub mod document;
pub mod encode;
pub mod eval;
pub mod export;
pub mod extract;
pub mod render;

pub use crate::foundation::color::Rgb8;
pub use crate::foundation::error::{ErrorKind, SvgifError, SvgifResult};

pub use crate::animation::model::{AnimationDescriptor, Keyframe, Value};
pub use crate::animation::timing::TimingFunction;
pub use crate::document::selector::Selector;
pub use crate::document::tree::{Document, NodeId};
pub use crate::encode::capabilities::EncoderCapabilities;
pub use crate::encode::config::{Dither, EncodeConfig};
pub use crate::encode::gif::{EncodedGif, GifSink};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::eval::sequence::FrameDescriptor;
pub use crate::export::options::{ExportOptions, QualityPreset};
pub use crate::export::pipeline::{
    CancelToken, ExportOutput, ExportProgress, ExportStage, Exporter, export_gif,
};
pub use crate::render::frame::FrameRenderer;
pub use crate::render::surface::{RasterBuffer, RasterSurface, ResvgSurface};
