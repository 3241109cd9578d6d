use super::*;
use crate::animation::timing::TimingFunction;

fn kf(offset: f64, prop: &str, raw: &str) -> Keyframe {
    Keyframe::single(offset, prop, Value::parse(raw))
}

fn channel_close(actual: &str, expected: Rgb8) {
    let got = Rgb8::parse_hex(actual).unwrap();
    for (g, e) in [(got.r, expected.r), (got.g, expected.g), (got.b, expected.b)] {
        assert!((i16::from(g) - i16::from(e)).abs() <= 1, "{actual}");
    }
}

#[test]
fn empty_and_single_keyframe_tracks() {
    assert!(interpolate(&[], 0.5).is_empty());
    let one = [kf(0.3, "opacity", "0.4")];
    assert_eq!(interpolate(&one, 0.9)["opacity"], Value::Number(0.4));
}

#[test]
fn numbers_lerp_linearly() {
    let track = [kf(0.0, "opacity", "0"), kf(1.0, "opacity", "1")];
    assert_eq!(interpolate(&track, 0.25)["opacity"], Value::Number(0.25));
}

#[test]
fn colors_blend_per_channel() {
    let track = [kf(0.0, "fill", "#ff0000"), kf(1.0, "fill", "#0000ff")];
    let Value::Text(mid) = &interpolate(&track, 0.5)["fill"] else {
        panic!("expected text color");
    };
    channel_close(mid, Rgb8::new(127, 0, 127));
}

#[test]
fn short_hex_colors_blend_too() {
    let v = lerp_value(
        &Value::parse("#000"),
        &Value::parse("#fff"),
        1.0,
    );
    assert_eq!(v, Value::Text("#ffffff".to_owned()));
}

#[test]
fn segment_lookup_uses_bounding_pair() {
    let track = [
        kf(0.0, "x", "0"),
        kf(0.5, "x", "100"),
        kf(1.0, "x", "0"),
    ];
    assert_eq!(interpolate(&track, 0.25)["x"], Value::Number(50.0));
    assert_eq!(interpolate(&track, 0.75)["x"], Value::Number(50.0));
    assert_eq!(interpolate(&track, 1.0)["x"], Value::Number(0.0));
}

#[test]
fn progress_outside_keyframe_range_holds_end_values() {
    let track = [kf(0.2, "x", "10"), kf(0.6, "x", "20")];
    assert_eq!(interpolate(&track, 0.2)["x"], Value::Number(10.0));
    assert_eq!(interpolate(&track, 0.6)["x"], Value::Number(20.0));
    assert_eq!(interpolate(&track, 0.0)["x"], Value::Number(10.0));
    assert_eq!(interpolate(&track, 1.0)["x"], Value::Number(20.0));

    let fade = [kf(0.2, "opacity", "0"), kf(0.6, "opacity", "1")];
    assert_eq!(interpolate(&fade, 0.0)["opacity"], Value::Number(0.0));
    assert_eq!(interpolate(&fade, 1.0)["opacity"], Value::Number(1.0));
}

#[test]
fn upper_keyframe_easing_overrides_segment() {
    let mut upper = kf(1.0, "x", "1");
    upper.easing = Some(TimingFunction::STEP_END);
    let track = [kf(0.0, "x", "0"), upper];
    assert_eq!(interpolate(&track, 0.9)["x"], Value::Number(0.0));
    assert_eq!(interpolate(&track, 1.0)["x"], Value::Number(1.0));
}

#[test]
fn transforms_with_matching_shape_lerp_each_argument() {
    let v = lerp_value(
        &Value::parse("rotate(0deg)"),
        &Value::parse("rotate(90deg)"),
        0.5,
    );
    assert_eq!(v, Value::Text("rotate(45deg)".to_owned()));

    let v = lerp_value(
        &Value::parse("translate(0, 0) scale(1)"),
        &Value::parse("translate(10px, 20px) scale(3)"),
        0.5,
    );
    assert_eq!(v, Value::Text("translate(5px, 10px) scale(2)".to_owned()));
}

#[test]
fn mismatched_transforms_snap_at_half() {
    let a = Value::parse("rotate(0)");
    let b = Value::parse("scale(2)");
    assert_eq!(lerp_value(&a, &b, 0.49), a);
    assert_eq!(lerp_value(&a, &b, 0.5), b);

    let c = Value::parse("translate(1 2)");
    let d = Value::parse("translate(1)");
    assert_eq!(lerp_value(&c, &d, 0.2), c);
}

#[test]
fn lengths_keep_their_unit() {
    let v = lerp_value(&Value::parse("10px"), &Value::parse("20px"), 0.5);
    assert_eq!(v, Value::Text("15px".to_owned()));
    let v = lerp_value(&Value::parse("0"), &Value::parse("50%"), 0.5);
    assert_eq!(v, Value::Text("25%".to_owned()));
    let v = lerp_value(&Value::parse("1em"), &Value::parse("10px"), 0.7);
    assert_eq!(v, Value::Text("10px".to_owned()));
}

#[test]
fn keywords_snap() {
    let a = Value::parse("visible");
    let b = Value::parse("hidden");
    assert_eq!(lerp_value(&a, &b, 0.3), a);
    assert_eq!(lerp_value(&a, &b, 0.8), b);
}

#[test]
fn properties_missing_on_one_side_pass_through() {
    let mut from = kf(0.0, "x", "0");
    from.values.insert("fill".to_owned(), Value::parse("red"));
    let to = kf(1.0, "x", "10");
    let mut to = to;
    to.values.insert("stroke".to_owned(), Value::parse("blue"));
    let out = interpolate(&[from, to], 0.5);
    assert_eq!(out["x"], Value::Number(5.0));
    assert_eq!(out["fill"], Value::Text("red".to_owned()));
    assert_eq!(out["stroke"], Value::Text("blue".to_owned()));
}

#[test]
fn transform_list_parser_rejects_garbage() {
    assert!(parse_transform_list("rotate(45deg) skewX(10)").is_some());
    assert!(parse_transform_list("rotate(45deg").is_none());
    assert!(parse_transform_list("rotate(abc)").is_none());
    assert!(parse_transform_list("").is_none());
}
