use crate::foundation::error::{SvgifError, SvgifResult};
use crate::render::surface::RasterBuffer;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of frames that will be pushed.
    pub frame_count: u32,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing index order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> SvgifResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: u32, frame: &RasterBuffer) -> SvgifResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> SvgifResult<()>;
}

/// Shared frame checks for sinks: started, in order, matching size.
#[derive(Debug, Default)]
pub(crate) struct FrameOrder {
    cfg: Option<SinkConfig>,
    last_idx: Option<u32>,
}

impl FrameOrder {
    pub(crate) fn begin(&mut self, cfg: SinkConfig) -> SvgifResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(SvgifError::validation("sink width/height must be non-zero"));
        }
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    pub(crate) fn check(&mut self, idx: u32, frame: &RasterBuffer) -> SvgifResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| SvgifError::encoding("sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(SvgifError::encoding(format!(
                "sink received out-of-order frame index {idx} after {last}"
            )));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(SvgifError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if !frame.is_well_formed() {
            return Err(SvgifError::validation("frame data size mismatch with width*height*4"));
        }
        self.last_idx = Some(idx);
        Ok(())
    }

    pub(crate) fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    order: FrameOrder,
    frames: Vec<(u32, RasterBuffer)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.order.config()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(u32, RasterBuffer)] {
        &self.frames
    }

    /// `true` once `end` ran.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SvgifResult<()> {
        self.order.begin(cfg)?;
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u32, frame: &RasterBuffer) -> SvgifResult<()> {
        self.order.check(idx, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> SvgifResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
