use crate::animation::model::{AnimationDescriptor, Direction, Iterations};

/// Linear (pre-timing) progress of `desc` at `timestamp`, in `[0, 1]`.
///
/// Returns `None` when the descriptor contributes nothing at this instant: before the delay
/// without a backwards fill, or after a finite run without a forwards fill.
pub fn local_progress(desc: &AnimationDescriptor, timestamp: f64) -> Option<f64> {
    let elapsed = timestamp - desc.delay;

    if elapsed < 0.0 {
        return desc
            .fill
            .holds_start()
            .then(|| directed(desc.direction, 0, 0.0));
    }

    if desc.duration <= 0.0 {
        let last = match desc.iterations {
            Iterations::Count(n) => n.saturating_sub(1),
            Iterations::Infinite => 0,
        };
        if elapsed > 0.0 && !desc.fill.holds_end() {
            return None;
        }
        return Some(directed(desc.direction, last, 1.0));
    }

    if let Some(span) = desc.iterations.span(desc.duration)
        && elapsed >= span
    {
        if elapsed > span && !desc.fill.holds_end() {
            return None;
        }
        // The final instant of a finite run shows the end of the last iteration.
        let last = match desc.iterations {
            Iterations::Count(n) => n.saturating_sub(1),
            Iterations::Infinite => 0,
        };
        return Some(directed(desc.direction, last, 1.0));
    }

    let iteration = (elapsed / desc.duration).floor();
    let raw = (elapsed - iteration * desc.duration) / desc.duration;
    Some(directed(desc.direction, iteration as u32, raw.clamp(0.0, 1.0)))
}

fn directed(direction: Direction, iteration: u32, p: f64) -> f64 {
    let odd = iteration % 2 == 1;
    let flip = match direction {
        Direction::Normal => false,
        Direction::Reverse => true,
        Direction::Alternate => odd,
        Direction::AlternateReverse => !odd,
    };
    if flip { 1.0 - p } else { p }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/progress.rs"]
mod tests;
