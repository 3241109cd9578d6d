use super::*;

#[test]
fn parses_simple_selectors() {
    assert_eq!(Selector::parse(".dot"), Some(Selector::Class("dot".to_owned())));
    assert_eq!(Selector::parse(" #logo "), Some(Selector::Id("logo".to_owned())));
    assert_eq!(Selector::parse("rect"), Some(Selector::Tag("rect".to_owned())));
    assert_eq!(Selector::parse("*"), Some(Selector::Universal));
    assert_eq!(Selector::parse("node(7)"), Some(Selector::Node(NodeId(7))));
}

#[test]
fn rejects_compound_and_descendant_selectors() {
    assert_eq!(Selector::parse("g .dot"), None);
    assert_eq!(Selector::parse("rect.dot"), None);
    assert_eq!(Selector::parse("a > b"), None);
    assert_eq!(Selector::parse("[fill]"), None);
    assert_eq!(Selector::parse(""), None);
    assert_eq!(Selector::parse("node(x)"), None);
}

#[test]
fn display_round_trips() {
    for raw in [".a-b", "#c_d", "circle", "*", "node(3)"] {
        let sel = Selector::parse(raw).unwrap();
        assert_eq!(sel.to_string(), raw);
    }
}

#[test]
fn serde_uses_textual_form() {
    let json = serde_json::to_string(&Selector::Id("x".to_owned())).unwrap();
    assert_eq!(json, "\"#x\"");
    let back: Selector = serde_json::from_str("\"node(2)\"").unwrap();
    assert_eq!(back, Selector::Node(NodeId(2)));
    assert!(serde_json::from_str::<Selector>("\"a b\"").is_err());
}
