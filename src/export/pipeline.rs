use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::document::tree::Document;
use crate::encode::capabilities::EncoderCapabilities;
use crate::encode::gif::GifSink;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::export::options::ExportOptions;
use crate::extract::extract_document;
use crate::foundation::error::{SvgifError, SvgifResult};
use crate::render::frame::FrameRenderer;
use crate::render::surface::{RasterSurface, ResvgSurface};

/// Progress reported when markup validation starts.
pub const PROGRESS_VALIDATING: f64 = 0.05;
/// Progress once animations are extracted.
pub const PROGRESS_EXTRACTED: f64 = 0.1;
/// Progress once the timeline is sampled; rendering starts here.
pub const PROGRESS_SEQUENCED: f64 = 0.2;
/// Progress when encoding starts; rendering ends here.
pub const PROGRESS_ENCODING: f64 = 0.8;

/// Pipeline stage carried by each progress report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum ExportStage {
    /// Parsing and checking the markup and options.
    Validating,
    /// Reading CSS and SMIL animations.
    Extracting,
    /// Sampling the timeline.
    Sequencing,
    /// Rasterizing frame `index` of `total`.
    Rendering {
        /// Zero-based frame index.
        index: u32,
        /// Number of frames in the export.
        total: u32,
    },
    /// Quantizing and writing the GIF.
    Encoding,
    /// Export finished successfully.
    Done,
    /// Export stopped with an error.
    Failed,
    /// Export stopped on a cancellation request.
    Cancelled,
}

impl ExportStage {
    /// `true` for `Done`, `Failed` and `Cancelled`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Cancelled)
    }
}

/// One progress report: a stage plus overall completion in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ExportProgress {
    /// Current stage.
    #[serde(flatten)]
    pub stage: ExportStage,
    /// Overall completion, non-decreasing across one export.
    pub progress: f64,
}

/// Cooperative cancellation flag shared between threads.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; observed at the next frame boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of a successful export.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOutput {
    /// Complete GIF file.
    pub bytes: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Number of frames in the GIF.
    pub frame_count: u32,
    /// Seconds of animation the frames cover.
    pub duration: f64,
}

type ProgressHook<'a> = Box<dyn FnMut(ExportProgress) + 'a>;

/// Runs one SVG to GIF export.
///
/// ```no_run
/// use svgif::{ExportOptions, Exporter};
///
/// let svg = std::fs::read_to_string("spinner.svg")?;
/// let out = Exporter::new(ExportOptions::default())
///     .on_progress(|p| eprintln!("{:?} {:.0}%", p.stage, p.progress * 100.0))
///     .run(&svg)?;
/// std::fs::write("spinner.gif", &out.bytes)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Exporter<'a> {
    opts: ExportOptions,
    caps: Option<EncoderCapabilities>,
    cancel: CancelToken,
    hook: Option<ProgressHook<'a>>,
    last_progress: f64,
}

impl std::fmt::Debug for Exporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("opts", &self.opts)
            .field("caps", &self.caps)
            .field("cancel", &self.cancel)
            .field("has_hook", &self.hook.is_some())
            .finish()
    }
}

impl<'a> Exporter<'a> {
    /// Create an exporter for `opts`. Capabilities are probed at run time unless given.
    pub fn new(opts: ExportOptions) -> Self {
        Self {
            opts,
            caps: None,
            cancel: CancelToken::new(),
            hook: None,
            last_progress: 0.0,
        }
    }

    /// Use `caps` instead of probing the host.
    pub fn with_capabilities(mut self, caps: EncoderCapabilities) -> Self {
        self.caps = Some(caps);
        self
    }

    /// Observe `token` for cancellation.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Receive a report at every stage transition and frame.
    pub fn on_progress(mut self, hook: impl FnMut(ExportProgress) + 'a) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Export `markup` with the default `resvg` surface.
    pub fn run(self, markup: &str) -> SvgifResult<ExportOutput> {
        self.run_with_surface(markup, ResvgSurface::new())
    }

    /// Export `markup`, rasterizing frames on `surface`.
    #[tracing::instrument(skip_all, fields(len = markup.len()))]
    pub fn run_with_surface<S: RasterSurface>(
        mut self,
        markup: &str,
        surface: S,
    ) -> SvgifResult<ExportOutput> {
        let result = self.export(markup, surface);
        match &result {
            Ok(out) => {
                tracing::info!(
                    frames = out.frame_count,
                    bytes = out.bytes.len(),
                    width = out.width,
                    height = out.height,
                    "export finished"
                );
            }
            Err(SvgifError::Cancelled) => {
                tracing::info!("export cancelled");
                self.report(ExportStage::Cancelled, self.last_progress);
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                self.report(ExportStage::Failed, self.last_progress);
            }
        }
        result
    }

    fn export<S: RasterSurface>(&mut self, markup: &str, surface: S) -> SvgifResult<ExportOutput> {
        let started = Instant::now();
        self.report(ExportStage::Validating, PROGRESS_VALIDATING);
        if markup.trim().is_empty() {
            return Err(SvgifError::validation("markup is empty"));
        }
        self.opts.validate()?;
        let doc = Document::parse(markup)?;
        self.check_cancel()?;

        let descriptors = extract_document(&doc);
        self.report(ExportStage::Extracting, PROGRESS_EXTRACTED);
        let resolved = self.opts.resolve(&doc, &descriptors)?;
        let frames = resolved.timeline(&descriptors);
        let span = resolved.span();
        let total = frames.len() as u32;
        tracing::debug!(
            animations = descriptors.len(),
            frames = total,
            duration = resolved.duration,
            frame_rate = resolved.frame_rate,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "timeline sequenced"
        );
        self.report(ExportStage::Sequencing, PROGRESS_SEQUENCED);

        let cfg = resolved.encode;
        let (width, height) = (cfg.width, cfg.height);
        let caps = self.caps.unwrap_or_else(EncoderCapabilities::probe);
        let mut renderer = FrameRenderer::new(&doc, &descriptors, surface, width, height);
        let mut sink = GifSink::new(cfg, caps);
        sink.begin(SinkConfig {
            width,
            height,
            frame_count: total,
        })?;

        let render_started = Instant::now();
        for (i, frame) in frames.iter().enumerate() {
            self.check_cancel()?;
            let index = i as u32;
            let progress = PROGRESS_SEQUENCED
                + (PROGRESS_ENCODING - PROGRESS_SEQUENCED) * f64::from(index) / f64::from(total);
            self.report(ExportStage::Rendering { index, total }, progress);
            let buffer = renderer.render_frame(frame.timestamp)?;
            sink.push_frame(frame.index, &buffer)?;
        }
        tracing::debug!(
            elapsed_ms = render_started.elapsed().as_millis() as u64,
            "frames rendered"
        );

        self.check_cancel()?;
        self.report(ExportStage::Encoding, PROGRESS_ENCODING);
        let encode_started = Instant::now();
        sink.end()?;
        let gif = sink
            .take_output()
            .ok_or_else(|| SvgifError::encoding("encoder produced no output"))?;
        tracing::debug!(
            elapsed_ms = encode_started.elapsed().as_millis() as u64,
            bytes = gif.bytes.len(),
            "gif encoded"
        );

        self.report(ExportStage::Done, 1.0);
        Ok(ExportOutput {
            bytes: gif.bytes,
            width: gif.width,
            height: gif.height,
            frame_count: gif.frame_count,
            duration: span,
        })
    }

    fn check_cancel(&self) -> SvgifResult<()> {
        if self.cancel.is_cancelled() {
            return Err(SvgifError::Cancelled);
        }
        Ok(())
    }

    fn report(&mut self, stage: ExportStage, progress: f64) {
        let progress = progress.clamp(self.last_progress, 1.0);
        self.last_progress = progress;
        if let Some(hook) = self.hook.as_mut() {
            hook(ExportProgress { stage, progress });
        }
    }
}

/// Export `markup` to GIF bytes with `opts`, probing host capabilities.
pub fn export_gif(markup: &str, opts: &ExportOptions) -> SvgifResult<ExportOutput> {
    Exporter::new(opts.clone()).run(markup)
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
