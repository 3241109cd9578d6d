use super::*;

const NAMED: [TimingFunction; 7] = [
    TimingFunction::Linear,
    TimingFunction::Ease,
    TimingFunction::EaseIn,
    TimingFunction::EaseOut,
    TimingFunction::EaseInOut,
    TimingFunction::STEP_START,
    TimingFunction::STEP_END,
];

#[test]
fn linear_is_identity() {
    for i in 0..=100 {
        let p = f64::from(i) / 100.0;
        assert_eq!(TimingFunction::Linear.evaluate(p), p);
    }
}

#[test]
fn named_curves_preserve_boundaries() {
    for f in NAMED {
        assert!(f.evaluate(0.0).abs() < 1e-9, "{f} at 0");
        assert!((f.evaluate(1.0) - 1.0).abs() < 1e-9, "{f} at 1");
    }
}

#[test]
fn ease_midpoint_matches_reference_curve() {
    let f = TimingFunction::parse("cubic-bezier(0.25, 0.1, 0.25, 1)").unwrap();
    assert!((f.evaluate(0.5) - 0.8024).abs() < 1e-2);
    assert!((TimingFunction::Ease.evaluate(0.5) - 0.8024).abs() < 1e-2);
}

#[test]
fn ease_in_out_is_symmetric_enough() {
    let a = TimingFunction::EaseInOut.evaluate(0.25);
    let b = TimingFunction::EaseInOut.evaluate(0.75);
    assert!((a + b - 1.0).abs() < 1e-2);
    assert!(a < 0.25);
}

#[test]
fn steps_end_rounds_down() {
    let f = TimingFunction::parse("steps(4, end)").unwrap();
    assert_eq!(f.evaluate(0.3), 0.25);
    assert_eq!(f.evaluate(0.24), 0.0);
    assert_eq!(f.evaluate(0.26), 0.25);
    assert_eq!(f.evaluate(1.0), 1.0);
}

#[test]
fn steps_start_rounds_up() {
    let f = TimingFunction::parse("steps(4, start)").unwrap();
    assert_eq!(f.evaluate(0.3), 0.5);
    assert_eq!(f.evaluate(0.0), 0.0);
    assert_eq!(
        TimingFunction::parse("steps(3)").unwrap(),
        TimingFunction::Steps {
            count: 3,
            position: StepPosition::End
        }
    );
}

#[test]
fn malformed_strings_fail_closed() {
    for bad in [
        "bounce",
        "cubic-bezier(1, 2)",
        "cubic-bezier(2, 0, 0.5, 1)",
        "steps(0, end)",
        "steps(2, middle)",
        "",
    ] {
        assert_eq!(TimingFunction::parse(bad), None, "{bad}");
        assert_eq!(evaluate_str(0.37, bad), 0.37);
    }
    assert!((evaluate_str(0.5, "ease") - 0.8024).abs() < 1e-2);
}

#[test]
fn progress_outside_unit_range_is_clamped() {
    assert_eq!(TimingFunction::Linear.evaluate(-0.5), 0.0);
    assert_eq!(TimingFunction::Linear.evaluate(1.5), 1.0);
    assert_eq!(TimingFunction::Linear.evaluate(f64::NAN), 0.0);
}

#[test]
fn display_parses_back() {
    let all = [
        TimingFunction::Linear,
        TimingFunction::Ease,
        TimingFunction::EaseIn,
        TimingFunction::EaseOut,
        TimingFunction::EaseInOut,
        TimingFunction::CubicBezier {
            x1: 0.1,
            y1: -0.5,
            x2: 0.9,
            y2: 1.5,
        },
        TimingFunction::Steps {
            count: 5,
            position: StepPosition::Start,
        },
    ];
    for f in all {
        assert_eq!(TimingFunction::parse(&f.to_string()), Some(f));
    }
}

#[test]
fn serde_uses_css_spelling() {
    let json = serde_json::to_string(&TimingFunction::EaseOut).unwrap();
    assert_eq!(json, "\"ease-out\"");
    let back: TimingFunction = serde_json::from_str("\"steps(2, start)\"").unwrap();
    assert_eq!(
        back,
        TimingFunction::Steps {
            count: 2,
            position: StepPosition::Start
        }
    );
    assert!(serde_json::from_str::<TimingFunction>("\"wobble\"").is_err());
}
