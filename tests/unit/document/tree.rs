use super::*;

const MARKUP: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="120" height="80px">
  <style><![CDATA[ .dot { fill: red; } ]]></style>
  <g id="group">
    <circle class="dot big" cx="10" cy="10" r="5" style="fill: blue; stroke: black"/>
    <rect class="bar" width="10" height="10">
      <animate attributeName="x" from="0" to="10" dur="1s"/>
    </rect>
    <use xlink:href="#group"/>
  </g>
  <text>a &lt; b</text>
</svg>"##;

fn doc() -> Document {
    Document::parse(MARKUP).unwrap()
}

#[test]
fn assigns_ids_in_document_order() {
    let d = doc();
    let names = d.elements().map(|id| d.name(id).to_owned()).collect::<Vec<_>>();
    assert_eq!(
        names,
        ["svg", "style", "g", "circle", "rect", "animate", "use", "text"]
    );
    assert_eq!(d.root(), NodeId(0));
    assert_eq!(d.parent(NodeId(5)), Some(NodeId(4)));
    assert_eq!(d.parent(d.root()), None);
}

#[test]
fn rejects_non_svg_roots_and_bad_xml() {
    let err = Document::parse("<html/>").unwrap_err();
    assert!(err.to_string().contains("<svg>"));
    assert!(Document::parse("<svg><g></svg>").is_err());
    assert!(Document::parse("not markup").is_err());
}

#[test]
fn keeps_namespaced_attribute_prefixes() {
    let d = doc();
    assert_eq!(d.attr(NodeId(6), "xlink:href"), Some("#group"));
}

#[test]
fn style_sheet_text_includes_cdata() {
    assert!(doc().style_sheet_text().contains(".dot { fill: red; }"));
}

#[test]
fn selectors_resolve_to_node_sets() {
    let d = doc();
    assert_eq!(d.select(&Selector::Class("dot".to_owned())), [NodeId(3)]);
    assert_eq!(d.select(&Selector::Class("big".to_owned())), [NodeId(3)]);
    assert!(d.select(&Selector::Class("do".to_owned())).is_empty());
    assert_eq!(d.select(&Selector::Id("group".to_owned())), [NodeId(2)]);
    assert_eq!(d.select(&Selector::Tag("rect".to_owned())), [NodeId(4)]);
    assert_eq!(d.select(&Selector::Node(NodeId(4))), [NodeId(4)]);
    assert!(d.select(&Selector::Node(NodeId(99))).is_empty());
    let all = d.select(&Selector::Universal);
    assert_eq!(all.len(), 7);
    assert!(!all.contains(&NodeId(5)));
}

#[test]
fn intrinsic_size_reads_root_dimensions() {
    assert_eq!(doc().intrinsic_size(), Some((120.0, 80.0)));
    let vb = Document::parse(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 50 40"/>"#)
        .unwrap();
    assert_eq!(vb.intrinsic_size(), Some((50.0, 40.0)));
    let pct = Document::parse(r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%"/>"#).unwrap();
    assert_eq!(pct.intrinsic_size(), None);
}

#[test]
fn merge_style_replaces_and_appends() {
    let mut updates = BTreeMap::new();
    updates.insert("fill".to_owned(), "green".to_owned());
    updates.insert("opacity".to_owned(), "0.5".to_owned());
    assert_eq!(
        merge_style("fill: blue; stroke: black;", &updates),
        "fill: green; stroke: black; opacity: 0.5"
    );
    assert_eq!(merge_style("", &updates), "fill: green; opacity: 0.5");
}

#[test]
fn serialization_applies_overrides_and_drops_animation_elements() {
    let d = doc();
    let mut table = OverrideTable::new();
    let mut circle = NodeOverrides::default();
    circle.style.insert("fill".to_owned(), "#00ff00".to_owned());
    circle.attrs.insert("cx".to_owned(), "42".to_owned());
    circle.attrs.insert("transform".to_owned(), "rotate(10)".to_owned());
    table.insert(NodeId(3), circle);
    let mut rect = NodeOverrides::default();
    rect.style.insert("opacity".to_owned(), "0.25".to_owned());
    table.insert(NodeId(4), rect);

    let out = d.to_markup(&table);
    assert!(out.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(out.contains("cx=\"42\""));
    assert!(out.contains("transform=\"rotate(10)\""));
    assert!(out.contains("style=\"fill: #00ff00; stroke: black\""));
    assert!(out.contains("style=\"opacity: 0.25\""));
    assert!(!out.contains("<animate"));
    assert!(out.contains("a &lt; b"));

    let reparsed = Document::parse(&out).unwrap();
    assert_eq!(reparsed.len(), d.len() - 1);
    assert_eq!(reparsed.attr(NodeId(3), "cx"), Some("42"));
}

#[test]
fn serialization_without_overrides_is_stable() {
    let d = doc();
    let once = d.to_markup(&OverrideTable::new());
    let twice = Document::parse(&once).unwrap().to_markup(&OverrideTable::new());
    assert_eq!(once, twice);
}
