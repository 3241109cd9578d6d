use super::*;
use crate::animation::model::{Direction, FillMode, Iterations, Keyframe, Origin, Value};
use crate::animation::timing::TimingFunction;
use crate::document::selector::Selector;

const MARKUP: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
  <rect id="box" class="a" width="10" height="10" fill="black" style="stroke: red"/>
  <circle class="a" r="2"/>
</svg>"#;

fn track(name: &str, target: Selector, prop: &str, from: &str, to: &str) -> AnimationDescriptor {
    AnimationDescriptor {
        name: name.to_owned(),
        target,
        property: prop.to_owned(),
        duration: 1.0,
        delay: 0.0,
        iterations: Iterations::Count(1),
        direction: Direction::Normal,
        timing: TimingFunction::Linear,
        fill: FillMode::None,
        origin: Origin::Css,
        keyframes: vec![
            Keyframe::single(0.0, prop, Value::parse(from)),
            Keyframe::single(1.0, prop, Value::parse(to)),
        ],
    }
}

struct Recording(Vec<String>);

impl RasterSurface for Recording {
    fn rasterize(&mut self, markup: &str, width: u32, height: u32) -> SvgifResult<RasterBuffer> {
        self.0.push(markup.to_owned());
        Ok(RasterBuffer::transparent(width, height))
    }
}

#[test]
fn plan_resolves_each_descriptor_once() {
    let doc = Document::parse(MARKUP).unwrap();
    let descs = [
        track("a", Selector::Class("a".to_owned()), "opacity", "0", "1"),
        track("b", Selector::Id("missing".to_owned()), "opacity", "0", "1"),
    ];
    let plan = FramePlan::new(&doc, &descs);
    assert_eq!(plan.targets(0), [NodeId(1), NodeId(2)]);
    assert!(plan.targets(1).is_empty());
    assert!(plan.targets(9).is_empty());
}

#[test]
fn overrides_route_transform_geometry_and_style() {
    let doc = Document::parse(MARKUP).unwrap();
    let descs = [
        track("t", Selector::Id("box".to_owned()), "transform", "rotate(0deg)", "rotate(90deg)"),
        track("g", Selector::Id("box".to_owned()), "width", "10", "20"),
        track("s", Selector::Id("box".to_owned()), "fill", "#000000", "#ffffff"),
    ];
    let plan = FramePlan::new(&doc, &descs);
    let table = frame_overrides(&descs, &plan, 0.5);
    let box_ov = &table[&NodeId(1)];
    assert_eq!(box_ov.attrs["transform"], "rotate(45)");
    assert_eq!(box_ov.attrs["width"], "15");
    assert_eq!(box_ov.style["fill"], "#808080");
    assert!(!box_ov.style.contains_key("width"));
}

#[test]
fn later_descriptors_win_per_property() {
    let doc = Document::parse(MARKUP).unwrap();
    let descs = [
        track("first", Selector::Class("a".to_owned()), "opacity", "0", "1"),
        track("second", Selector::Id("box".to_owned()), "opacity", "1", "1"),
    ];
    let plan = FramePlan::new(&doc, &descs);
    let table = frame_overrides(&descs, &plan, 0.5);
    assert_eq!(table[&NodeId(1)].style["opacity"], "1");
    assert_eq!(table[&NodeId(2)].style["opacity"], "0.5");
}

#[test]
fn inactive_descriptors_leave_no_overrides() {
    let doc = Document::parse(MARKUP).unwrap();
    let mut d = track("late", Selector::Id("box".to_owned()), "opacity", "0", "1");
    d.delay = 5.0;
    let descs = [d];
    let plan = FramePlan::new(&doc, &descs);
    assert!(frame_overrides(&descs, &plan, 1.0).is_empty());
}

#[test]
fn renderer_serializes_merged_style_for_the_surface() {
    let doc = Document::parse(MARKUP).unwrap();
    let descs = [track("o", Selector::Id("box".to_owned()), "opacity", "0", "1")];
    let mut renderer = FrameRenderer::new(&doc, &descs, Recording(Vec::new()), 4, 4);
    let frame = renderer.render_frame(0.25).unwrap();
    assert_eq!((frame.width, frame.height), (4, 4));
    assert_eq!(renderer.size(), (4, 4));
    assert!(renderer.surface.0[0].contains("style=\"stroke: red; opacity: 0.25\""));
}
