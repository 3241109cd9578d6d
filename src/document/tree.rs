use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use crate::document::selector::Selector;
use crate::foundation::error::{SvgifError, SvgifResult};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Elements that describe animation rather than content; omitted when serializing frames.
pub(crate) const ANIMATION_ELEMENTS: [&str; 4] = ["animate", "animateTransform", "animateMotion", "set"];

/// Stable per-element id, assigned in document order at parse time (root is 0).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug)]
enum Child {
    Element(NodeId),
    Text(String),
}

#[derive(Clone, Debug)]
struct Element {
    name: String,
    /// Non-SVG namespace, emitted as a default `xmlns` on this element.
    foreign_ns: Option<String>,
    attrs: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<Child>,
}

/// Per-node property overrides produced for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeOverrides {
    /// Attributes to set (replacing any existing value).
    pub attrs: BTreeMap<String, String>,
    /// Inline style declarations merged into the existing `style` attribute.
    pub style: BTreeMap<String, String>,
}

/// Override table keyed by node id.
pub type OverrideTable = HashMap<NodeId, NodeOverrides>;

/// Parsed SVG element tree.
///
/// The tree is immutable once parsed; per-frame changes are expressed as an [`OverrideTable`] and
/// applied while serializing.
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Element>,
    namespaces: BTreeMap<String, String>,
}

impl Document {
    /// Parse SVG markup. The root element must be `<svg>`.
    pub fn parse(markup: &str) -> SvgifResult<Self> {
        let opts = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let xml = roxmltree::Document::parse_with_options(markup, opts)
            .map_err(|e| SvgifError::validation(format!("markup is not well-formed XML: {e}")))?;

        let root = xml.root_element();
        if root.tag_name().name() != "svg" {
            return Err(SvgifError::validation(format!(
                "root element must be <svg>, found <{}>",
                root.tag_name().name()
            )));
        }

        let mut doc = Self {
            nodes: Vec::new(),
            namespaces: BTreeMap::new(),
        };
        doc.push_element(root, None);
        Ok(doc)
    }

    fn push_element(&mut self, node: roxmltree::Node<'_, '_>, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);

        for ns in node.namespaces() {
            if let Some(prefix) = ns.name()
                && prefix != "xml"
            {
                self.namespaces
                    .entry(prefix.to_owned())
                    .or_insert_with(|| ns.uri().to_owned());
            }
        }

        let foreign_ns = match node.tag_name().namespace() {
            Some(ns) if ns != SVG_NS => {
                let parent_ns = node
                    .parent_element()
                    .and_then(|p| p.tag_name().namespace());
                (parent_ns != Some(ns)).then(|| ns.to_owned())
            }
            _ => None,
        };

        let attrs = node
            .attributes()
            .map(|a| (qualified_attr_name(node, a), a.value().to_owned()))
            .collect();

        self.nodes.push(Element {
            name: node.tag_name().name().to_owned(),
            foreign_ns,
            attrs,
            parent,
            children: Vec::new(),
        });

        let mut children = Vec::new();
        for child in node.children() {
            if child.is_element() {
                children.push(Child::Element(self.push_element(child, Some(id))));
            } else if child.is_text()
                && let Some(text) = child.text()
            {
                children.push(Child::Text(text.to_owned()));
            }
        }
        self.nodes[id.0 as usize].children = children;
        id
    }

    /// Root `<svg>` element.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a parsed document has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All element ids in document order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Local tag name of `id`.
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0 as usize].name
    }

    /// Parent element of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0 as usize].parent
    }

    /// Attribute value by qualified name (`href`, `xlink:href`, `class`, ...).
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0 as usize]
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text content of the element and its descendants.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for child in &self.nodes[id.0 as usize].children {
            match child {
                Child::Text(t) => out.push_str(t),
                Child::Element(c) => self.collect_text(*c, out),
            }
        }
    }

    /// Text of every `<style>` element, joined by newlines.
    pub fn style_sheet_text(&self) -> String {
        self.elements()
            .filter(|&id| self.name(id) == "style")
            .map(|id| self.text(id))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Resolve a selector to matching element ids, in document order.
    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        match selector {
            Selector::Node(id) => {
                if (id.0 as usize) < self.nodes.len() {
                    vec![*id]
                } else {
                    Vec::new()
                }
            }
            _ => self
                .elements()
                .filter(|&id| self.matches(id, selector))
                .collect(),
        }
    }

    fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        match selector {
            Selector::Universal => !ANIMATION_ELEMENTS.contains(&self.name(id)),
            Selector::Tag(tag) => self.name(id) == tag,
            Selector::Id(want) => self.attr(id, "id") == Some(want.as_str()),
            Selector::Class(want) => self
                .attr(id, "class")
                .is_some_and(|c| c.split_whitespace().any(|c| c == want)),
            Selector::Node(n) => *n == id,
        }
    }

    /// Root `width`/`height` in user units, when given without units or in `px`.
    ///
    /// Falls back to the `viewBox` size.
    pub fn intrinsic_size(&self) -> Option<(f64, f64)> {
        let root = self.root();
        let len = |name: &str| {
            self.attr(root, name).and_then(|v| {
                let v = v.trim();
                let v = v.strip_suffix("px").unwrap_or(v);
                v.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)
            })
        };
        if let (Some(w), Some(h)) = (len("width"), len("height")) {
            return Some((w, h));
        }
        let vb = self.attr(root, "viewBox")?;
        let nums = vb
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<f64>().ok())
            .collect::<Option<Vec<_>>>()?;
        match nums[..] {
            [_, _, w, h] if w > 0.0 && h > 0.0 => Some((w, h)),
            _ => None,
        }
    }

    /// Serialize the document with `overrides` applied. Animation elements are omitted.
    pub fn to_markup(&self, overrides: &OverrideTable) -> String {
        let mut out = String::with_capacity(4096);
        self.write_element(self.root(), overrides, &mut out);
        out
    }

    fn write_element(&self, id: NodeId, overrides: &OverrideTable, out: &mut String) {
        let el = &self.nodes[id.0 as usize];
        let ov = overrides.get(&id);

        out.push('<');
        out.push_str(&el.name);

        if id == self.root() {
            write_attr(out, "xmlns", SVG_NS);
            for (prefix, uri) in &self.namespaces {
                write_attr(out, &format!("xmlns:{prefix}"), uri);
            }
            if !self.namespaces.contains_key("xlink") {
                write_attr(out, "xmlns:xlink", XLINK_NS);
            }
        } else if let Some(ns) = &el.foreign_ns {
            write_attr(out, "xmlns", ns);
        }

        let mut wrote_style = false;
        for (k, v) in &el.attrs {
            if k == "style" {
                let merged = match ov {
                    Some(ov) if !ov.style.is_empty() => merge_style(v, &ov.style),
                    _ => v.clone(),
                };
                write_attr(out, k, &merged);
                wrote_style = true;
                continue;
            }
            match ov.and_then(|ov| ov.attrs.get(k)) {
                Some(replacement) => write_attr(out, k, replacement),
                None => write_attr(out, k, v),
            }
        }
        if let Some(ov) = ov {
            for (k, v) in &ov.attrs {
                if !el.attrs.iter().any(|(existing, _)| existing == k) {
                    write_attr(out, k, v);
                }
            }
            if !wrote_style && !ov.style.is_empty() {
                write_attr(out, "style", &merge_style("", &ov.style));
            }
        }

        let children = el
            .children
            .iter()
            .filter(|c| match c {
                Child::Element(c) => !ANIMATION_ELEMENTS.contains(&self.name(*c)),
                Child::Text(_) => true,
            })
            .collect::<Vec<_>>();
        if children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in children {
            match child {
                Child::Element(c) => self.write_element(*c, overrides, out),
                Child::Text(t) => escape_into(out, t, false),
            }
        }
        let _ = write!(out, "</{}>", el.name);
    }
}

/// Merge declarations into an inline style string.
///
/// Existing declarations keep their position; same-name declarations are replaced and new ones
/// are appended.
pub fn merge_style(existing: &str, updates: &BTreeMap<String, String>) -> String {
    let mut decls = parse_style(existing);
    for (k, v) in updates {
        match decls.iter_mut().find(|(name, _)| name == k) {
            Some(slot) => slot.1 = v.clone(),
            None => decls.push((k.clone(), v.clone())),
        }
    }
    decls
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Split an inline style attribute into `(name, value)` declarations.
pub fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            let k = k.trim();
            let v = v.trim();
            (!k.is_empty() && !v.is_empty()).then(|| (k.to_ascii_lowercase(), v.to_owned()))
        })
        .collect()
}

fn qualified_attr_name(node: roxmltree::Node<'_, '_>, attr: roxmltree::Attribute<'_, '_>) -> String {
    match attr.namespace() {
        None => attr.name().to_owned(),
        Some(XLINK_NS) => format!("xlink:{}", attr.name()),
        Some(XML_NS) => format!("xml:{}", attr.name()),
        Some(ns) => match node.lookup_prefix(ns) {
            Some(prefix) => format!("{prefix}:{}", attr.name()),
            None => attr.name().to_owned(),
        },
    }
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_into(out, value, true);
    out.push('"');
}

fn escape_into(out: &mut String, s: &str, attr: bool) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/tree.rs"]
mod tests;
