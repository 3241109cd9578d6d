use crate::animation::model::AnimationDescriptor;
use crate::document::tree::Document;
use crate::encode::config::{Dither, EncodeConfig, Repeat};
use crate::eval::sequence::{
    FALLBACK_DURATION, FrameDescriptor, MIN_FRAME_RATE, frame_count, natural_duration,
    optimal_frame_rate, sequence, sequence_n,
};
use crate::foundation::color::Rgb8;
use crate::foundation::error::{SvgifError, SvgifResult};

/// Output size used when neither the options nor the document give one.
pub const DEFAULT_SIZE: (u32, u32) = (800, 600);

/// Most frames one export renders. Derived timelines longer than this are sampled at a lower
/// rate so the whole duration still fits.
pub const MAX_FRAMES: u32 = 100;

/// Frame count above which a file size target forces coarser quantization.
pub const SIZE_TARGET_FRAME_LIMIT: u32 = 30;

/// Quality floor applied under a file size target with many frames.
pub const SIZE_TARGET_MIN_QUALITY: i32 = 15;

/// Named bundle of quantization settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityPreset {
    /// Finest sampling, dithered.
    High,
    /// Balanced default for static documents.
    Medium,
    /// Fastest sampling, single worker.
    Low,
    /// Tuned for smooth motion; default for animated documents.
    Animation,
}

/// Settings a [`QualityPreset`] expands to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresetSettings {
    /// NeuQuant sampling factor.
    pub quality: i32,
    /// Requested quantization workers.
    pub workers: usize,
    /// Dithering kernel, if any.
    pub dither: Option<Dither>,
}

impl QualityPreset {
    /// Parse a preset name (case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            "animation" => Some(Self::Animation),
            _ => None,
        }
    }

    /// Quantization settings of this preset.
    pub fn settings(self) -> PresetSettings {
        let (quality, workers, dither) = match self {
            Self::High => (1, 4, Some(Dither::FloydSteinberg)),
            Self::Medium => (10, 2, None),
            Self::Low => (20, 1, None),
            Self::Animation => (5, 4, Some(Dither::Atkinson)),
        };
        PresetSettings {
            quality,
            workers,
            dither,
        }
    }
}

/// Caller-facing export options. Every field is optional.
///
/// Deserializes from JSON config files; unknown keys are rejected.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportOptions {
    /// Output width in pixels.
    pub width: Option<u32>,
    /// Output height in pixels.
    pub height: Option<u32>,
    /// Timeline length in seconds.
    pub duration: Option<f64>,
    /// Exact number of frames to render.
    pub frames: Option<u32>,
    /// Delay between frames in milliseconds.
    pub frame_delay: Option<u32>,
    /// Sampling rate in frames per second.
    pub frame_rate: Option<f64>,
    /// NeuQuant sampling factor, `1..=30`.
    pub quality: Option<i32>,
    /// Requested quantization workers.
    pub workers: Option<usize>,
    /// Dithering kernel name, or `none`.
    pub dither: Option<String>,
    /// `#rrggbb` color keyed out to transparency.
    pub transparent_color: Option<String>,
    /// `#rrggbb` color to flatten alpha over.
    pub background: Option<String>,
    /// Desired upper bound on the output size in bytes.
    pub target_file_size: Option<u64>,
    /// Preset supplying quality, workers and dither defaults.
    pub quality_preset: Option<QualityPreset>,
    /// Extra plays after the first; absent loops forever.
    pub repeat: Option<u16>,
}

/// Fully resolved settings for one export.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedExport {
    /// Timeline length in seconds.
    pub duration: f64,
    /// Sampling rate in frames per second.
    pub frame_rate: f64,
    /// Exact frame count, when the caller fixed it.
    pub frames: Option<u32>,
    /// Encoder settings, including the output size and delay.
    pub encode: EncodeConfig,
}

impl ResolvedExport {
    /// Sample the timeline: exactly `frames` frames when fixed, else `duration * frame_rate`.
    pub fn timeline(&self, descriptors: &[AnimationDescriptor]) -> Vec<FrameDescriptor> {
        match self.frames {
            Some(n) => sequence_n(descriptors, n, self.frame_rate),
            None => sequence(descriptors, self.duration, self.frame_rate),
        }
    }

    /// Seconds of animation covered by the timeline.
    pub fn span(&self) -> f64 {
        match self.frames {
            Some(n) => f64::from(n) / self.frame_rate,
            None => self.duration,
        }
    }
}

impl ExportOptions {
    /// Check option values that do not depend on the document.
    pub fn validate(&self) -> SvgifResult<()> {
        if self.width == Some(0) || self.height == Some(0) {
            return Err(SvgifError::validation("width/height must be non-zero"));
        }
        if let Some(d) = self.duration
            && !(d.is_finite() && d > 0.0)
        {
            return Err(SvgifError::validation(format!("duration must be positive, got {d}")));
        }
        if let Some(r) = self.frame_rate
            && !(r.is_finite() && r > 0.0)
        {
            return Err(SvgifError::validation(format!("frame_rate must be positive, got {r}")));
        }
        if let Some(n) = self.frames
            && !(1..=MAX_FRAMES).contains(&n)
        {
            return Err(SvgifError::validation(format!(
                "frames must be in 1..={MAX_FRAMES}, got {n}"
            )));
        }
        if self.frame_delay == Some(0) {
            return Err(SvgifError::validation("frame_delay must be at least 1ms"));
        }
        self.dither_setting()?;
        parse_color("transparent_color", self.transparent_color.as_deref())?;
        parse_color("background", self.background.as_deref())?;
        Ok(())
    }

    /// Resolve every setting against the parsed document and its animations.
    pub fn resolve(
        &self,
        doc: &Document,
        descriptors: &[AnimationDescriptor],
    ) -> SvgifResult<ResolvedExport> {
        self.validate()?;

        let duration = self
            .duration
            .or_else(|| natural_duration(descriptors))
            .unwrap_or(FALLBACK_DURATION);

        let mut frame_rate = match (self.frame_rate, self.frame_delay) {
            (Some(rate), _) => rate,
            (None, Some(delay)) => 1000.0 / f64::from(delay),
            (None, None) => {
                let rate = optimal_frame_rate(descriptors);
                if self.target_file_size.is_some() {
                    rate.min(MIN_FRAME_RATE)
                } else {
                    rate
                }
            }
        };
        let mut frames = self.frames;
        let mut frame_delay = self.frame_delay;
        if frames.is_none()
            && !descriptors.is_empty()
            && frame_count(duration, frame_rate) > MAX_FRAMES
        {
            let capped = f64::from(MAX_FRAMES) / duration;
            tracing::warn!(
                duration,
                frame_rate,
                capped_rate = capped,
                max_frames = MAX_FRAMES,
                "timeline exceeds the frame cap; lowering the frame rate"
            );
            frame_rate = capped;
            frames = Some(MAX_FRAMES);
            frame_delay = None;
        }
        let frame_delay_ms =
            frame_delay.unwrap_or_else(|| (1000.0 / frame_rate).round().max(1.0) as u32);

        let preset = self.quality_preset.unwrap_or(if descriptors.is_empty() {
            QualityPreset::Medium
        } else {
            QualityPreset::Animation
        });
        let base = preset.settings();
        let mut quality = self.quality.unwrap_or(base.quality);
        let dither = match self.dither_setting()? {
            Some(choice) => choice,
            None => base.dither,
        };

        let (width, height) = self.output_size(doc);
        let mut encode = EncodeConfig::new(width, height);
        encode.frame_delay_ms = frame_delay_ms;
        encode.workers = self.workers.unwrap_or(base.workers);
        encode.dither = dither;
        encode.transparent_color =
            parse_color("transparent_color", self.transparent_color.as_deref())?;
        encode.background = parse_color("background", self.background.as_deref())?;
        if let Some(n) = self.repeat {
            encode.repeat = Repeat::Finite(n);
        }

        if self.target_file_size.is_some() {
            let expected = match frames {
                Some(n) => n,
                None if descriptors.is_empty() => 1,
                None => frame_count(duration, frame_rate),
            };
            if expected > SIZE_TARGET_FRAME_LIMIT && quality < SIZE_TARGET_MIN_QUALITY {
                tracing::debug!(frames = expected, quality, "raising quality for file size target");
                quality = SIZE_TARGET_MIN_QUALITY;
            }
        }
        encode.quality = quality;
        encode.validate()?;

        Ok(ResolvedExport {
            duration,
            frame_rate,
            frames,
            encode,
        })
    }

    /// Explicit size, else the document's intrinsic size, else 800x600.
    ///
    /// A single explicit side keeps the document's aspect ratio when it has one.
    fn output_size(&self, doc: &Document) -> (u32, u32) {
        let intrinsic = doc.intrinsic_size();
        let px = |v: f64| (v.round() as u32).max(1);
        match (self.width, self.height, intrinsic) {
            (Some(w), Some(h), _) => (w, h),
            (Some(w), None, Some((iw, ih))) => (w, px(f64::from(w) * ih / iw)),
            (None, Some(h), Some((iw, ih))) => (px(f64::from(h) * iw / ih), h),
            (None, None, Some((iw, ih))) => (px(iw), px(ih)),
            (w, h, None) => (w.unwrap_or(DEFAULT_SIZE.0), h.unwrap_or(DEFAULT_SIZE.1)),
        }
    }

    /// `Some(choice)` when the caller set a dither option, `None` to defer to the preset.
    fn dither_setting(&self) -> SvgifResult<Option<Option<Dither>>> {
        match self.dither.as_deref() {
            None => Ok(None),
            Some(raw) => Dither::parse(raw)
                .map(Some)
                .ok_or_else(|| SvgifError::validation(format!("unknown dither kernel '{raw}'"))),
        }
    }
}

fn parse_color(field: &str, raw: Option<&str>) -> SvgifResult<Option<Rgb8>> {
    match raw {
        None => Ok(None),
        Some(raw) => Rgb8::parse_hex(raw)
            .map(Some)
            .ok_or_else(|| SvgifError::validation(format!("{field} must be #rrggbb, got '{raw}'"))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/options.rs"]
mod tests;
