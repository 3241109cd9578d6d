use super::*;

fn extract(body: &str) -> Vec<AnimationDescriptor> {
    let markup = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">{body}</svg>"#
    );
    extract_smil(&Document::parse(&markup).unwrap())
}

#[test]
fn animate_from_to_targets_parent_id() {
    let list = extract(
        r#"<rect id="box"><animate attributeName="x" from="0" to="100" dur="2s" begin="0.5s" repeatCount="3" fill="freeze"/></rect>"#,
    );
    assert_eq!(list.len(), 1);
    let d = &list[0];
    assert_eq!(d.name, "smil_animate_x");
    assert_eq!(d.target, Selector::Id("box".to_owned()));
    assert_eq!(d.property, "x");
    assert_eq!(d.duration, 2.0);
    assert_eq!(d.delay, 0.5);
    assert_eq!(d.iterations, Iterations::Count(3));
    assert_eq!(d.fill, FillMode::Forwards);
    assert_eq!(d.timing, TimingFunction::Linear);
    assert_eq!(d.origin, Origin::Smil);
    assert_eq!(d.keyframes.len(), 2);
    assert_eq!(d.keyframes[1].values["x"], Value::Number(100.0));
}

#[test]
fn parent_without_id_uses_node_reference() {
    let list = extract(r#"<g><circle r="1"><animate attributeName="r" values="1;5" dur="1s"/></circle></g>"#);
    assert_eq!(list[0].target, Selector::Node(NodeId(2)));
}

#[test]
fn href_overrides_parent() {
    let list = extract(
        r##"<circle id="c"/><animate xlink:href="#c" attributeName="opacity" values="0;1" dur="1s"/>"##,
    );
    assert_eq!(list[0].target, Selector::Id("c".to_owned()));
    let list = extract(r##"<circle id="d"/><animate href="#d" attributeName="r" values="0;1" dur="1s"/>"##);
    assert_eq!(list[0].target, Selector::Id("d".to_owned()));
}

#[test]
fn values_list_spacing_and_key_times() {
    let list = extract(
        r#"<rect id="r"><animate attributeName="opacity" values="0; 1; 0;" dur="500ms" repeatCount="indefinite"/></rect>"#,
    );
    let d = &list[0];
    assert_eq!(d.duration, 0.5);
    assert_eq!(d.iterations, Iterations::Infinite);
    let offsets = d.keyframes.iter().map(|k| k.offset).collect::<Vec<_>>();
    assert_eq!(offsets, [0.0, 0.5, 1.0]);

    let list = extract(
        r#"<rect id="r"><animate attributeName="x" values="0;10;20" keyTimes="0;0.2;1" dur="1s"/></rect>"#,
    );
    let offsets = list[0].keyframes.iter().map(|k| k.offset).collect::<Vec<_>>();
    assert_eq!(offsets, [0.0, 0.2, 1.0]);

    let list = extract(
        r#"<rect id="r"><animate attributeName="x" values="0;10;20" keyTimes="0;1" dur="1s"/></rect>"#,
    );
    assert_eq!(list[0].keyframes[1].offset, 0.5);
}

#[test]
fn animate_transform_wraps_type() {
    let list = extract(
        r#"<g id="g"><animateTransform attributeName="transform" type="rotate" from="0 50 50" to="360 50 50" dur="4s"/></g>"#,
    );
    let d = &list[0];
    assert_eq!(d.name, "smil_animateTransform_transform");
    assert_eq!(
        d.keyframes[0].values["transform"],
        Value::Text("rotate(0 50 50)".to_owned())
    );

    let list = extract(r#"<g id="g"><animateTransform attributeName="transform" values="0 0;10 5" dur="1s"/></g>"#);
    assert_eq!(
        list[0].keyframes[1].values["transform"],
        Value::Text("translate(10 5)".to_owned())
    );
}

#[test]
fn animate_motion_points_become_translations() {
    let list = extract(r#"<circle id="c"><animateMotion values="0,0; 10,20" dur="1s"/></circle>"#);
    assert_eq!(list[0].property, "transform");
    assert_eq!(
        list[0].keyframes[1].values["transform"],
        Value::Text("translate(10, 20)".to_owned())
    );
    assert!(extract(r#"<circle id="c"><animateMotion path="M0,0 L10,10" dur="1s"/></circle>"#).is_empty());
}

#[test]
fn unusable_durations_are_skipped() {
    assert!(extract(r#"<rect id="r"><animate attributeName="x" from="0" to="1"/></rect>"#).is_empty());
    assert!(extract(r#"<rect id="r"><animate attributeName="x" from="0" to="1" dur="0s"/></rect>"#).is_empty());
    assert!(
        extract(r#"<rect id="r"><animate attributeName="x" from="0" to="1" dur="indefinite"/></rect>"#)
            .is_empty()
    );
    assert!(extract(r#"<rect id="r"><animate from="0" to="1" dur="1s"/></rect>"#).is_empty());
}

#[test]
fn set_without_dur_is_frozen_and_instant() {
    let list = extract(r#"<rect id="r"><set attributeName="fill" to="red" begin="1s"/></rect>"#);
    let d = &list[0];
    assert_eq!(d.duration, 0.0);
    assert_eq!(d.delay, 1.0);
    assert_eq!(d.fill, FillMode::Forwards);
    assert_eq!(d.keyframes.len(), 1);
    assert_eq!(d.keyframes[0].values["fill"], Value::Text("red".to_owned()));
}

#[test]
fn from_by_adds_numbers() {
    let list = extract(r#"<rect id="r"><animate attributeName="x" from="5" by="10" dur="1s"/></rect>"#);
    assert_eq!(list[0].keyframes[1].values["x"], Value::Number(15.0));
}

#[test]
fn calc_modes_set_keyframe_easing() {
    let list = extract(
        r#"<rect id="r"><animate attributeName="x" values="0;1;2" calcMode="discrete" dur="1s"/></rect>"#,
    );
    assert_eq!(list[0].keyframes[0].easing, None);
    assert_eq!(list[0].keyframes[2].easing, Some(TimingFunction::STEP_END));

    let list = extract(
        r#"<rect id="r"><animate attributeName="x" values="0;1" calcMode="spline" keySplines="0.5 0 0.5 1" dur="1s"/></rect>"#,
    );
    assert_eq!(
        list[0].keyframes[1].easing,
        Some(TimingFunction::CubicBezier {
            x1: 0.5,
            y1: 0.0,
            x2: 0.5,
            y2: 1.0,
        })
    );
}

#[test]
fn colliding_names_get_suffixes() {
    let list = extract(
        r#"<rect id="a"><animate attributeName="x" values="0;1" dur="1s"/></rect>
           <rect id="b"><animate attributeName="x" values="0;1" dur="1s"/></rect>
           <rect id="c"><animate attributeName="x" values="0;1" dur="1s"/></rect>"#,
    );
    let names = list.iter().map(|d| d.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["smil_animate_x", "smil_animate_x_2", "smil_animate_x_3"]);
}
