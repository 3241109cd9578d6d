use crate::foundation::color::Rgb8;
use crate::foundation::error::{SvgifError, SvgifResult};

/// Fastest/lowest quality NeuQuant sampling factor accepted by the encoder.
pub const MAX_QUALITY: i32 = 30;

/// Error-diffusion kernel used when re-indexing frames against their palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dither {
    /// Classic 4-neighbour kernel (7/16, 3/16, 5/16, 1/16).
    FloydSteinberg,
    /// Cheaper 3-neighbour approximation (3/8, 3/8, 2/8).
    FalseFloydSteinberg,
    /// 12-neighbour kernel over two rows (/42).
    Stucki,
    /// Partial diffusion (6/8 of the error), keeps flat areas crisp.
    Atkinson,
}

impl Dither {
    /// Parse a kernel name; `none` yields `Ok(None)`.
    pub fn parse(raw: &str) -> Option<Option<Self>> {
        let norm = raw.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match norm.as_str() {
            "none" | "off" | "false" => Some(None),
            "floyd-steinberg" | "floydsteinberg" => Some(Some(Self::FloydSteinberg)),
            "false-floyd-steinberg" | "falsefloydsteinberg" => Some(Some(Self::FalseFloydSteinberg)),
            "stucki" => Some(Some(Self::Stucki)),
            "atkinson" => Some(Some(Self::Atkinson)),
            _ => None,
        }
    }
}

/// Loop behavior written into the GIF.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    /// Loop forever.
    #[default]
    Infinite,
    /// Play this many extra times.
    Finite(u16),
}

/// Encoder settings for one export.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeConfig {
    /// Output width in pixels (`1..=65535`).
    pub width: u32,
    /// Output height in pixels (`1..=65535`).
    pub height: u32,
    /// Delay between frames in milliseconds.
    pub frame_delay_ms: u32,
    /// NeuQuant sampling factor, `1..=30`; lower is better and slower.
    pub quality: i32,
    /// Requested quantization workers; `0` quantizes inline.
    pub workers: usize,
    /// Optional error-diffusion re-indexing.
    pub dither: Option<Dither>,
    /// Pixels of exactly this color become fully transparent.
    pub transparent_color: Option<Rgb8>,
    /// Flatten alpha over this color; without it, alpha is kept (binary in GIF).
    pub background: Option<Rgb8>,
    /// Loop behavior.
    pub repeat: Repeat,
}

impl EncodeConfig {
    /// Defaults for a `width` x `height` export: 100ms delay, quality 10, no workers, no dither.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame_delay_ms: 100,
            quality: 10,
            workers: 0,
            dither: None,
            transparent_color: None,
            background: None,
            repeat: Repeat::Infinite,
        }
    }

    /// Check dimension and quality bounds.
    pub fn validate(&self) -> SvgifResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SvgifError::validation("width/height must be non-zero"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(SvgifError::validation(format!(
                "{}x{} exceeds the GIF limit of 65535 pixels per side",
                self.width, self.height
            )));
        }
        if !(1..=MAX_QUALITY).contains(&self.quality) {
            return Err(SvgifError::validation(format!(
                "quality must be in 1..={MAX_QUALITY}, got {}",
                self.quality
            )));
        }
        Ok(())
    }

    /// Frame delay in GIF centiseconds (at least 1).
    pub fn delay_centis(&self) -> u16 {
        let cs = (f64::from(self.frame_delay_ms) / 10.0).round();
        cs.clamp(1.0, f64::from(u16::MAX)) as u16
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/config.rs"]
mod tests;
