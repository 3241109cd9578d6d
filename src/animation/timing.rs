use std::fmt;

use crate::foundation::math::fmt_num;

/// Which edge of each interval a step function jumps on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepPosition {
    /// Jump at the start of each interval (rounds up).
    Start,
    /// Jump at the end of each interval (rounds down).
    End,
}

/// CSS-style timing function mapping linear progress to eased progress.
///
/// Serializes as its canonical CSS spelling (`"ease-in"`, `"cubic-bezier(0.1, 0.7, 1, 0.1)"`,
/// `"steps(4, end)"`).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TimingFunction {
    /// Identity.
    Linear,
    /// `cubic-bezier(0.25, 0.1, 0.25, 1)`.
    #[default]
    Ease,
    /// `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// Arbitrary control points; `x1` and `x2` lie in `[0, 1]`.
    CubicBezier {
        /// First control point x.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x.
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
    /// Discrete steps; `count >= 1`.
    Steps {
        /// Number of intervals.
        count: u32,
        /// Jump edge.
        position: StepPosition,
    },
}

impl TimingFunction {
    /// `step-start`.
    pub const STEP_START: Self = Self::Steps {
        count: 1,
        position: StepPosition::Start,
    };
    /// `step-end`.
    pub const STEP_END: Self = Self::Steps {
        count: 1,
        position: StepPosition::End,
    };

    /// Map `progress` (clamped to `[0, 1]`) through this curve.
    pub fn evaluate(self, progress: f64) -> f64 {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        match self {
            Self::Linear => p,
            Self::Ease => cubic_bezier(p, 0.25, 0.1, 0.25, 1.0),
            Self::EaseIn => cubic_bezier(p, 0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => cubic_bezier(p, 0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => cubic_bezier(p, 0.42, 0.0, 0.58, 1.0),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(p, x1, y1, x2, y2),
            Self::Steps { count, position } => {
                let n = f64::from(count.max(1));
                match position {
                    StepPosition::Start => (p * n).ceil() / n,
                    StepPosition::End => (p * n).floor() / n,
                }
            }
        }
    }

    /// Parse a CSS timing function. Returns `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "linear" => return Some(Self::Linear),
            "ease" => return Some(Self::Ease),
            "ease-in" => return Some(Self::EaseIn),
            "ease-out" => return Some(Self::EaseOut),
            "ease-in-out" => return Some(Self::EaseInOut),
            "step-start" => return Some(Self::STEP_START),
            "step-end" => return Some(Self::STEP_END),
            _ => {}
        }

        if let Some(args) = function_args(&s, "cubic-bezier") {
            let nums = args
                .iter()
                .map(|a| a.parse::<f64>().ok().filter(|v| v.is_finite()))
                .collect::<Option<Vec<_>>>()?;
            let [x1, y1, x2, y2] = nums[..] else {
                return None;
            };
            if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
                return None;
            }
            return Some(Self::CubicBezier { x1, y1, x2, y2 });
        }

        if let Some(args) = function_args(&s, "steps") {
            let count = args.first()?.parse::<u32>().ok().filter(|n| *n >= 1)?;
            let position = match args.get(1).map(String::as_str) {
                None | Some("end") | Some("jump-end") => StepPosition::End,
                Some("start") | Some("jump-start") => StepPosition::Start,
                Some(_) => return None,
            };
            if args.len() > 2 {
                return None;
            }
            return Some(Self::Steps { count, position });
        }

        None
    }
}

/// Evaluate a timing function given as a CSS string.
///
/// Unknown or malformed strings fail closed: `progress` is returned unchanged.
pub fn evaluate_str(progress: f64, timing: &str) -> f64 {
    match TimingFunction::parse(timing) {
        Some(f) => f.evaluate(progress),
        None => progress,
    }
}

fn function_args(s: &str, name: &str) -> Option<Vec<String>> {
    let rest = s.strip_prefix(name)?.trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some(
        inner
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect(),
    )
}

/// Solve a unit cubic-bezier for `x` and return its `y`.
///
/// Newton-Raphson with at most 8 iterations; stops early within 1e-3 and bails out with the last
/// estimate when the derivative is too flat.
fn cubic_bezier(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample_x = |t: f64| ((ax * t + bx) * t + cx) * t;
    let sample_y = |t: f64| ((ay * t + by) * t + cy) * t;
    let slope_x = |t: f64| (3.0 * ax * t + 2.0 * bx) * t + cx;

    let mut t = x;
    for _ in 0..8 {
        let err = sample_x(t) - x;
        if err.abs() < 1e-3 {
            break;
        }
        let d = slope_x(t);
        if d.abs() < 1e-3 {
            break;
        }
        t -= err / d;
    }
    sample_y(t)
}

impl fmt::Display for TimingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier { x1, y1, x2, y2 } => write!(
                f,
                "cubic-bezier({}, {}, {}, {})",
                fmt_num(x1),
                fmt_num(y1),
                fmt_num(x2),
                fmt_num(y2)
            ),
            Self::Steps { count, position } => {
                let pos = match position {
                    StepPosition::Start => "start",
                    StepPosition::End => "end",
                };
                write!(f, "steps({count}, {pos})")
            }
        }
    }
}

impl From<TimingFunction> for String {
    fn from(value: TimingFunction) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for TimingFunction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown timing function '{value}'"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timing.rs"]
mod tests;
