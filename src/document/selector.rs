use std::fmt;

use crate::document::tree::NodeId;

/// Simple selector naming the elements an animation targets.
///
/// Serializes as its textual form: `.class`, `#id`, `tag`, `*` or `node(<n>)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Selector {
    /// `.name`: elements whose `class` list contains the name.
    Class(String),
    /// `#name`: the element with this `id`.
    Id(String),
    /// `name`: elements with this tag.
    Tag(String),
    /// `*`: every content element.
    Universal,
    /// Parse-time reference to one element without an id.
    Node(NodeId),
}

impl Selector {
    /// Parse a single simple selector. Compound, descendant and attribute selectors yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw == "*" {
            return Some(Self::Universal);
        }
        if let Some(inner) = raw
            .strip_prefix("node(")
            .and_then(|r| r.strip_suffix(')'))
        {
            return inner.trim().parse::<u32>().ok().map(|n| Self::Node(NodeId(n)));
        }
        if let Some(name) = raw.strip_prefix('.') {
            return is_ident(name).then(|| Self::Class(name.to_owned()));
        }
        if let Some(name) = raw.strip_prefix('#') {
            return is_ident(name).then(|| Self::Id(name.to_owned()));
        }
        is_ident(raw).then(|| Self::Tag(raw.to_owned()))
    }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '-' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(c) => write!(f, ".{c}"),
            Self::Id(i) => write!(f, "#{i}"),
            Self::Tag(t) => f.write_str(t),
            Self::Universal => f.write_str("*"),
            Self::Node(n) => write!(f, "node({})", n.0),
        }
    }
}

impl From<Selector> for String {
    fn from(value: Selector) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Selector {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unsupported selector '{value}'"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/selector.rs"]
mod tests;
