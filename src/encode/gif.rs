use rayon::prelude::*;

use crate::encode::capabilities::EncoderCapabilities;
use crate::encode::config::{EncodeConfig, Repeat};
use crate::encode::dither::dither_indices;
use crate::encode::sink::{FrameOrder, FrameSink, SinkConfig};
use crate::foundation::color::Rgb8;
use crate::foundation::error::{SvgifError, SvgifResult};
use crate::foundation::math::{demul_u8, mul_div255_u16};
use crate::render::surface::RasterBuffer;

/// Encoded GIF bytes plus metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedGif {
    /// Complete GIF file.
    pub bytes: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Number of frames written.
    pub frame_count: u32,
    /// Total playback time of one loop, in milliseconds.
    pub duration_ms: u64,
}

/// Encode premultiplied frames into an animated GIF.
///
/// Quantization runs on a pool of `caps.effective_workers(cfg.workers)` threads, or inline when
/// that is zero. Any failure is an [`SvgifError::Encoding`] and no bytes are returned.
#[tracing::instrument(skip_all, fields(frames = frames.len(), width = cfg.width, height = cfg.height))]
pub fn encode(
    frames: &[RasterBuffer],
    cfg: &EncodeConfig,
    caps: &EncoderCapabilities,
) -> SvgifResult<EncodedGif> {
    cfg.validate()?;
    if frames.is_empty() {
        return Err(SvgifError::encoding("no frames to encode"));
    }
    for (i, f) in frames.iter().enumerate() {
        if f.width != cfg.width || f.height != cfg.height || !f.is_well_formed() {
            return Err(SvgifError::encoding(format!(
                "frame {i} is {}x{}, expected {}x{}",
                f.width, f.height, cfg.width, cfg.height
            )));
        }
    }

    let workers = caps.effective_workers(cfg.workers);
    let quantize = |frame: &RasterBuffer| quantize_frame(frame, cfg);
    let quantized = if workers == 0 {
        frames.iter().map(quantize).collect::<SvgifResult<Vec<_>>>()?
    } else {
        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => {
                tracing::debug!(workers, "quantizing on worker pool");
                pool.install(|| frames.par_iter().map(quantize).collect::<SvgifResult<Vec<_>>>())?
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to build worker pool; quantizing inline");
                frames.iter().map(quantize).collect::<SvgifResult<Vec<_>>>()?
            }
        }
    };

    let bytes = write_gif(quantized, cfg)?;
    let frame_count = frames.len() as u32;
    Ok(EncodedGif {
        bytes,
        width: cfg.width,
        height: cfg.height,
        frame_count,
        duration_ms: u64::from(cfg.delay_centis()) * 10 * u64::from(frame_count),
    })
}

fn quantize_frame(frame: &RasterBuffer, cfg: &EncodeConfig) -> SvgifResult<gif::Frame<'static>> {
    let mut rgba = to_straight_rgba(&frame.data, cfg.background, cfg.transparent_color);
    let source = cfg.dither.map(|_| rgba.clone());

    let w = u16::try_from(frame.width).map_err(|_| SvgifError::encoding("frame too wide"))?;
    let h = u16::try_from(frame.height).map_err(|_| SvgifError::encoding("frame too tall"))?;
    let mut out = gif::Frame::from_rgba_speed(w, h, &mut rgba, cfg.quality);

    if let (Some(kind), Some(source)) = (cfg.dither, source) {
        let palette = out
            .palette
            .as_deref()
            .ok_or_else(|| SvgifError::encoding("quantized frame has no palette"))?;
        let indices = dither_indices(
            &source,
            usize::from(w),
            usize::from(h),
            palette,
            out.transparent,
            kind,
        );
        out.buffer = indices.into();
    }
    Ok(out)
}

fn write_gif(frames: Vec<gif::Frame<'static>>, cfg: &EncodeConfig) -> SvgifResult<Vec<u8>> {
    let enc_err = |e: gif::EncodingError| SvgifError::encoding(format!("gif write failed: {e}"));

    let w = cfg.width as u16;
    let h = cfg.height as u16;
    let mut encoder = gif::Encoder::new(Vec::new(), w, h, &[]).map_err(enc_err)?;
    let repeat = match cfg.repeat {
        Repeat::Infinite => gif::Repeat::Infinite,
        Repeat::Finite(n) => gif::Repeat::Finite(n),
    };
    encoder.set_repeat(repeat).map_err(enc_err)?;

    let delay = cfg.delay_centis();
    for mut frame in frames {
        frame.delay = delay;
        if frame.transparent.is_some() {
            frame.dispose = gif::DisposalMethod::Background;
        }
        encoder.write_frame(&frame).map_err(enc_err)?;
    }
    encoder
        .into_inner()
        .map_err(|e| SvgifError::encoding(format!("gif finalize failed: {e}")))
}

/// Convert premultiplied RGBA8 to straight RGBA8.
///
/// With a background the result is opaque; otherwise alpha is kept. Pixels whose color equals
/// `transparent` are keyed out to full transparency afterwards.
pub(crate) fn to_straight_rgba(
    premul: &[u8],
    background: Option<Rgb8>,
    transparent: Option<Rgb8>,
) -> Vec<u8> {
    let mut out = vec![0u8; premul.len()];
    for (d, s) in out.chunks_exact_mut(4).zip(premul.chunks_exact(4)) {
        let a = s[3];
        match background {
            Some(bg) => {
                if a == 255 {
                    d.copy_from_slice(s);
                } else {
                    let inv = 255u16 - u16::from(a);
                    let over = |c: u8, bg: u8| {
                        (u16::from(c) + mul_div255_u16(u16::from(bg), inv)).min(255) as u8
                    };
                    d[0] = over(s[0], bg.r);
                    d[1] = over(s[1], bg.g);
                    d[2] = over(s[2], bg.b);
                }
                d[3] = 255;
            }
            None => {
                d[0] = demul_u8(s[0], a);
                d[1] = demul_u8(s[1], a);
                d[2] = demul_u8(s[2], a);
                d[3] = a;
            }
        }
        if let Some(key) = transparent
            && d[3] != 0
            && [d[0], d[1], d[2]] == [key.r, key.g, key.b]
        {
            d.copy_from_slice(&[0, 0, 0, 0]);
        }
    }
    out
}

/// [`FrameSink`] that buffers frames and encodes a GIF on `end`.
#[derive(Debug)]
pub struct GifSink {
    cfg: EncodeConfig,
    caps: EncoderCapabilities,
    order: FrameOrder,
    frames: Vec<RasterBuffer>,
    output: Option<EncodedGif>,
}

impl GifSink {
    /// Create a sink that encodes with `cfg` under `caps`.
    pub fn new(cfg: EncodeConfig, caps: EncoderCapabilities) -> Self {
        Self {
            cfg,
            caps,
            order: FrameOrder::default(),
            frames: Vec::new(),
            output: None,
        }
    }

    /// Take the encoded GIF produced by `end`.
    pub fn take_output(&mut self) -> Option<EncodedGif> {
        self.output.take()
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> SvgifResult<()> {
        if cfg.width != self.cfg.width || cfg.height != self.cfg.height {
            return Err(SvgifError::validation(format!(
                "sink configured for {}x{}, encoder for {}x{}",
                cfg.width, cfg.height, self.cfg.width, self.cfg.height
            )));
        }
        self.cfg.validate()?;
        self.frames = Vec::with_capacity(cfg.frame_count as usize);
        self.output = None;
        self.order.begin(cfg)
    }

    fn push_frame(&mut self, idx: u32, frame: &RasterBuffer) -> SvgifResult<()> {
        self.order.check(idx, frame)?;
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> SvgifResult<()> {
        if self.order.config().is_none() {
            return Err(SvgifError::encoding("gif sink not started"));
        }
        let frames = std::mem::take(&mut self.frames);
        self.output = Some(encode(&frames, &self.cfg, &self.caps)?);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
