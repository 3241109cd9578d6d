use std::collections::BTreeMap;
use std::fmt;

use crate::animation::timing::TimingFunction;
use crate::document::selector::Selector;
use crate::foundation::math::fmt_num;

/// Interpolated or declared property values keyed by property name.
pub type PropertyMap = BTreeMap<String, Value>;

/// A keyframe property value.
///
/// Unitless numbers are kept numeric; everything else (colors, lengths with units, transform
/// lists, keywords) stays textual and is classified at interpolation time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Unitless number.
    Number(f64),
    /// Any other value, verbatim (trimmed).
    Text(String),
}

impl Value {
    /// Classify a raw declaration value.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Number(v),
            _ => Self::Text(raw.to_owned()),
        }
    }

    /// Numeric view of this value, if it is a unitless number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => f.write_str(&fmt_num(*v)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A property-value snapshot pinned to a fractional offset of the animation timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Offset in `[0, 1]`.
    pub offset: f64,
    /// Property values declared at this offset.
    pub values: PropertyMap,
    /// Easing for the segment that ends at this keyframe; overrides the descriptor timing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<TimingFunction>,
}

impl Keyframe {
    /// Build a keyframe with a single property.
    pub fn single(offset: f64, property: &str, value: Value) -> Self {
        let mut values = PropertyMap::new();
        values.insert(property.to_owned(), value);
        Self {
            offset,
            values,
            easing: None,
        }
    }
}

/// Number of times an animation cycle plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Iterations {
    /// A finite, positive count.
    Count(u32),
    /// Repeats forever.
    Infinite,
}

impl Default for Iterations {
    fn default() -> Self {
        Self::Count(1)
    }
}

impl Iterations {
    /// Parse a CSS `animation-iteration-count` or SMIL `repeatCount`.
    ///
    /// Fractional counts are truncated and clamped to at least one.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("infinite") || raw.eq_ignore_ascii_case("indefinite") {
            return Some(Self::Infinite);
        }
        let v = raw.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)?;
        Some(Self::Count((v.floor() as u32).max(1)))
    }

    /// Length of the whole run in seconds, or `None` when infinite.
    pub fn span(self, duration: f64) -> Option<f64> {
        match self {
            Self::Count(n) => Some(duration * f64::from(n)),
            Self::Infinite => None,
        }
    }
}

impl fmt::Display for Iterations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Infinite => f.write_str("infinite"),
        }
    }
}

/// Playback direction across iterations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Every iteration plays forward.
    #[default]
    Normal,
    /// Every iteration plays backward.
    Reverse,
    /// Even iterations forward, odd iterations backward.
    Alternate,
    /// Even iterations backward, odd iterations forward.
    AlternateReverse,
}

impl Direction {
    /// Match a CSS direction keyword.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "reverse" => Some(Self::Reverse),
            "alternate" => Some(Self::Alternate),
            "alternate-reverse" => Some(Self::AlternateReverse),
            _ => None,
        }
    }

    /// CSS spelling.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Reverse => "reverse",
            Self::Alternate => "alternate",
            Self::AlternateReverse => "alternate-reverse",
        }
    }
}

/// Whether values persist outside the active window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillMode {
    /// Values only apply while active.
    #[default]
    None,
    /// The final value is held after the run ends.
    Forwards,
    /// The first value is applied during the delay.
    Backwards,
    /// Both of the above.
    Both,
}

impl FillMode {
    /// Match a CSS fill-mode keyword.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "forwards" => Some(Self::Forwards),
            "backwards" => Some(Self::Backwards),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    /// CSS spelling.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Forwards => "forwards",
            Self::Backwards => "backwards",
            Self::Both => "both",
        }
    }

    /// `true` when the end value persists after the run.
    pub fn holds_end(self) -> bool {
        matches!(self, Self::Forwards | Self::Both)
    }

    /// `true` when the start value applies during the delay.
    pub fn holds_start(self) -> bool {
        matches!(self, Self::Backwards | Self::Both)
    }
}

/// Declarative dialect a descriptor was extracted from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Embedded style sheet (`@keyframes` + `animation`).
    Css,
    /// Animation element (`<animate>` and friends).
    Smil,
}

/// One normalized animation unit: a single property animated on a set of elements.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationDescriptor {
    /// Keyframes name (CSS) or synthesized name (SMIL).
    pub name: String,
    /// Elements to mutate.
    pub target: Selector,
    /// Animated property.
    pub property: String,
    /// Seconds per iteration.
    pub duration: f64,
    /// Seconds before the first iteration starts.
    pub delay: f64,
    /// Iteration count.
    pub iterations: Iterations,
    /// Direction semantics.
    pub direction: Direction,
    /// Descriptor-wide timing function.
    pub timing: TimingFunction,
    /// Fill behavior outside the active window.
    pub fill: FillMode,
    /// Source dialect.
    pub origin: Origin,
    /// Keyframes ordered by offset.
    pub keyframes: Vec<Keyframe>,
}

impl AnimationDescriptor {
    /// Timeline position (seconds) where the run ends, or `None` for infinite runs.
    pub fn end_time(&self) -> Option<f64> {
        self.iterations
            .span(self.duration)
            .map(|span| self.delay + span)
    }

    /// `true` when `timestamp` falls inside the active window.
    pub fn is_active_at(&self, timestamp: f64) -> bool {
        let elapsed = timestamp - self.delay;
        if elapsed < 0.0 {
            return false;
        }
        match self.iterations.span(self.duration) {
            Some(span) => elapsed <= span,
            None => true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/model.rs"]
mod tests;
