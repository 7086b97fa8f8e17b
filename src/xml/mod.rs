//! The raw element tree consumed by the document-model reader.
//!
//! quince does not parse XML itself: an external tokenizer hands it a tree of
//! elements whose names carry a short namespace alias (for example `w:p`,
//! `r:id`). This module defines that tree plus the navigation helpers the
//! readers rely on.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// A node in the raw element tree: either an element or a text node.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// A raw element with a namespace-aliased name, attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<XmlNode>,
}

static EMPTY_ELEMENT: Lazy<XmlElement> = Lazy::new(XmlElement::default);

impl XmlElement {
    /// Create an element from its parts.
    pub fn new(
        name: impl Into<String>,
        attributes: HashMap<String, String>,
        children: Vec<XmlNode>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            children,
        }
    }

    /// Look up an attribute value by name.
    #[inline]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Iterate over the element children, skipping text nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// The first child element with the given name, if any.
    pub fn first(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|child| child.name == name)
    }

    /// The first child element with the given name, or a shared empty element.
    ///
    /// Keeps attribute probing short: `element.first_or_empty("w:jc").attr("w:val")`.
    pub fn first_or_empty(&self, name: &str) -> &XmlElement {
        self.first(name).unwrap_or(&EMPTY_ELEMENT)
    }

    /// All child elements with the given name, in document order.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.child_elements().filter(move |child| child.name == name)
    }

    /// Concatenated text of this element and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.append_text(&mut out);
        out
    }

    fn append_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(element) => element.append_text(out),
            }
        }
    }
}

/// Shorthand for building an element node in tests and fixtures.
pub fn element(
    name: impl Into<String>,
    attributes: HashMap<String, String>,
    children: Vec<XmlNode>,
) -> XmlNode {
    XmlNode::Element(XmlElement::new(name, attributes, children))
}

/// Shorthand for building a text node.
pub fn text(value: impl Into<String>) -> XmlNode {
    XmlNode::Text(value.into())
}
