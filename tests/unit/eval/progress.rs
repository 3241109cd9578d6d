use super::*;
use crate::animation::model::{FillMode, Origin};
use crate::animation::timing::TimingFunction;
use crate::document::selector::Selector;

fn anim(direction: Direction, iterations: Iterations, fill: FillMode) -> AnimationDescriptor {
    AnimationDescriptor {
        name: "a".to_owned(),
        target: Selector::Universal,
        property: "opacity".to_owned(),
        duration: 1.0,
        delay: 0.0,
        iterations,
        direction,
        timing: TimingFunction::Linear,
        fill,
        origin: Origin::Css,
        keyframes: vec![],
    }
}

fn close(a: Option<f64>, b: f64) {
    let a = a.unwrap();
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn alternate_flips_odd_iterations() {
    let d = anim(Direction::Alternate, Iterations::Count(2), FillMode::None);
    close(local_progress(&d, 0.25), 0.25);
    close(local_progress(&d, 1.25), 0.75);
}

#[test]
fn reverse_and_alternate_reverse() {
    let r = anim(Direction::Reverse, Iterations::Count(2), FillMode::None);
    close(local_progress(&r, 0.25), 0.75);
    close(local_progress(&r, 1.25), 0.75);
    let ar = anim(Direction::AlternateReverse, Iterations::Count(2), FillMode::None);
    close(local_progress(&ar, 0.25), 0.75);
    close(local_progress(&ar, 1.25), 0.25);
}

#[test]
fn final_instant_maps_to_end_value() {
    let d = anim(Direction::Normal, Iterations::Count(2), FillMode::None);
    close(local_progress(&d, 2.0), 1.0);
    close(local_progress(&d, 1.0), 0.0);
    assert_eq!(local_progress(&d, 2.1), None);

    let alt = anim(Direction::Alternate, Iterations::Count(2), FillMode::None);
    close(local_progress(&alt, 2.0), 0.0);
}

#[test]
fn fill_modes_hold_outside_window() {
    let mut d = anim(Direction::Normal, Iterations::Count(1), FillMode::Forwards);
    d.delay = 1.0;
    assert_eq!(local_progress(&d, 0.5), None);
    close(local_progress(&d, 5.0), 1.0);

    d.fill = FillMode::Backwards;
    close(local_progress(&d, 0.5), 0.0);
    assert_eq!(local_progress(&d, 5.0), None);

    d.direction = Direction::Reverse;
    close(local_progress(&d, 0.5), 1.0);
}

#[test]
fn infinite_runs_never_end() {
    let d = anim(Direction::Normal, Iterations::Infinite, FillMode::None);
    close(local_progress(&d, 100.5), 0.5);
}

#[test]
fn zero_duration_jumps_to_end() {
    let mut d = anim(Direction::Normal, Iterations::Count(1), FillMode::Forwards);
    d.duration = 0.0;
    d.delay = 1.0;
    assert_eq!(local_progress(&d, 0.5), None);
    close(local_progress(&d, 1.0), 1.0);
    close(local_progress(&d, 3.0), 1.0);
    d.fill = FillMode::None;
    assert_eq!(local_progress(&d, 3.0), None);
}
