use crate::animation::model::{AnimationDescriptor, Iterations};

/// Total export duration used when nothing else determines it.
pub const FALLBACK_DURATION: f64 = 2.0;

/// Lower bound of [`optimal_frame_rate`] for animated content.
pub const MIN_FRAME_RATE: f64 = 10.0;
/// Upper bound of [`optimal_frame_rate`].
pub const MAX_FRAME_RATE: f64 = 30.0;

/// One sampled instant of the export timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameDescriptor {
    /// Zero-based frame index.
    pub index: u32,
    /// Seconds from the start of the timeline.
    pub timestamp: f64,
    /// Names of descriptors active at `timestamp`, unique, in descriptor order.
    pub active: Vec<String>,
}

/// Sample the timeline at `frame_rate` for `total_duration` seconds.
///
/// Produces `ceil(total_duration * frame_rate)` frames (at least one). With no descriptors the
/// result is a single static frame at `t = 0`.
pub fn sequence(
    descriptors: &[AnimationDescriptor],
    total_duration: f64,
    frame_rate: f64,
) -> Vec<FrameDescriptor> {
    if descriptors.is_empty() {
        return vec![FrameDescriptor {
            index: 0,
            timestamp: 0.0,
            active: Vec::new(),
        }];
    }
    let count = frame_count(total_duration, frame_rate);
    sequence_n(descriptors, count, frame_rate)
}

/// Sample exactly `count` frames at `frame_rate`.
pub fn sequence_n(
    descriptors: &[AnimationDescriptor],
    count: u32,
    frame_rate: f64,
) -> Vec<FrameDescriptor> {
    (0..count.max(1))
        .map(|index| {
            let timestamp = f64::from(index) / frame_rate;
            let mut active = Vec::<String>::new();
            for d in descriptors {
                if d.is_active_at(timestamp) && !active.contains(&d.name) {
                    active.push(d.name.clone());
                }
            }
            FrameDescriptor {
                index,
                timestamp,
                active,
            }
        })
        .collect()
}

/// `ceil(total_duration * frame_rate)` with a small tolerance, clamped to at least one frame.
pub fn frame_count(total_duration: f64, frame_rate: f64) -> u32 {
    let raw = total_duration * frame_rate;
    if !raw.is_finite() || raw <= 0.0 {
        return 1;
    }
    ((raw - 1e-9).ceil() as u32).max(1)
}

/// Frame rate that resolves the fastest keyframe change, clamped to `[10, 30]`.
///
/// Returns 1 for static documents and 10 when no keyframe gap is found.
pub fn optimal_frame_rate(descriptors: &[AnimationDescriptor]) -> f64 {
    if descriptors.is_empty() {
        return 1.0;
    }
    let shortest = descriptors
        .iter()
        .flat_map(|d| {
            d.keyframes
                .windows(2)
                .map(move |w| (w[1].offset - w[0].offset) * d.duration)
        })
        .filter(|gap| *gap > 0.0)
        .fold(f64::INFINITY, f64::min);
    if !shortest.is_finite() {
        return MIN_FRAME_RATE;
    }
    (1.0 / shortest).round().clamp(MIN_FRAME_RATE, MAX_FRAME_RATE)
}

/// Length of the longest finite run, counting infinite descriptors as one iteration.
///
/// `None` when there are no descriptors or every run is empty.
pub fn natural_duration(descriptors: &[AnimationDescriptor]) -> Option<f64> {
    descriptors
        .iter()
        .map(|d| {
            let iterations = match d.iterations {
                Iterations::Count(n) => f64::from(n),
                Iterations::Infinite => 1.0,
            };
            d.delay + d.duration * iterations
        })
        .filter(|end| end.is_finite() && *end > 0.0)
        .reduce(f64::max)
}

#[cfg(test)]
#[path = "../../tests/unit/eval/sequence.rs"]
mod tests;
