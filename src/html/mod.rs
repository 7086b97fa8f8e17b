//! The output tree: an HTML-shaped node model plus its serializers.
//!
//! Renderers build this tree, [`simplify`] normalizes it, and the writers in
//! [`write`] turn it into HTML or Markdown text. Tags carry the merge
//! metadata (`fresh`, `separator`) that drives [`simplify::collapse`].

pub mod paths;
pub mod simplify;
pub mod write;

use std::collections::BTreeMap;

use phf::phf_set;

/// Tags serialized without a closing tag.
static VOID_TAG_NAMES: phf::Set<&'static str> = phf_set! {
    "br",
    "hr",
    "img",
};

/// A placeholder identity for content produced asynchronously (images).
pub type DeferredId = usize;

#[derive(Debug, Clone, PartialEq)]
pub enum HtmlNode {
    Element(HtmlElement),
    Text(String),
    /// Keeps an otherwise-empty element alive through simplification, and
    /// ends the current collapse run. Stripped by the writers.
    ForceWrite,
    /// A placeholder replaced by deferred content before writing.
    Deferred(DeferredId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlElement {
    pub tag: Tag,
    pub children: Vec<HtmlNode>,
}

/// An element tag plus the metadata collapsing works from.
///
/// `tag_names` lists every name this element may merge into; the first one is
/// the name it is written as.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub tag_names: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    /// Fresh elements never merge into a preceding sibling.
    pub fresh: bool,
    /// Text inserted between merged children, empty for none.
    pub separator: String,
}

impl Tag {
    /// The name this tag is written as.
    pub fn tag_name(&self) -> &str {
        self.tag_names.first().map(String::as_str).unwrap_or("")
    }

    pub fn is_void(&self) -> bool {
        VOID_TAG_NAMES.contains(self.tag_name())
    }
}

impl HtmlElement {
    /// True when collapsing may fold `self` into a preceding `other`.
    pub(crate) fn collapsible_into(&self, other: &HtmlElement) -> bool {
        !self.tag.fresh
            && self
                .tag
                .tag_names
                .iter()
                .any(|name| name == other.tag.tag_name())
            && self.tag.attributes == other.tag.attributes
    }
}

/// A collapsible element: merges into an identical preceding sibling.
pub fn non_fresh_element(
    tag_name: impl Into<String>,
    attributes: BTreeMap<String, String>,
    children: Vec<HtmlNode>,
) -> HtmlNode {
    element_with_tag(
        Tag {
            tag_names: vec![tag_name.into()],
            attributes,
            fresh: false,
            separator: String::new(),
        },
        children,
    )
}

/// A fresh element: always written as its own element.
pub fn fresh_element(
    tag_name: impl Into<String>,
    attributes: BTreeMap<String, String>,
    children: Vec<HtmlNode>,
) -> HtmlNode {
    element_with_tag(
        Tag {
            tag_names: vec![tag_name.into()],
            attributes,
            fresh: true,
            separator: String::new(),
        },
        children,
    )
}

pub fn element_with_tag(tag: Tag, children: Vec<HtmlNode>) -> HtmlNode {
    HtmlNode::Element(HtmlElement { tag, children })
}

pub fn text(value: impl Into<String>) -> HtmlNode {
    HtmlNode::Text(value.into())
}

/// Shorthand for an attribute map.
pub fn attributes(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
