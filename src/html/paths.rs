//! Output paths: where a document element's content lands in the output tree.
//!
//! A path is a chain of nested elements (`ul > li`, `p.tip:fresh`) or the
//! ignore marker, which discards the content entirely.

use std::collections::BTreeMap;

use super::{element_with_tag, HtmlNode, Tag};

#[derive(Debug, Clone, PartialEq)]
pub enum HtmlPath {
    /// Discard the matched content and everything it would have produced.
    Ignore,
    /// Wrap the content in the listed elements, outermost first.
    Elements(Vec<HtmlPathElement>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlPathElement {
    /// The names this element may be written as or merge into; the first is
    /// the one it is created with.
    pub tag_names: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub fresh: bool,
    pub separator: Option<String>,
}

impl HtmlPathElement {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_names: vec![tag_name.into()],
            attributes: BTreeMap::new(),
            fresh: false,
            separator: None,
        }
    }

    pub fn fresh(mut self) -> Self {
        self.fresh = true;
        self
    }

    pub(crate) fn tag(&self) -> Tag {
        Tag {
            tag_names: self.tag_names.clone(),
            attributes: self.attributes.clone(),
            fresh: self.fresh,
            separator: self.separator.clone().unwrap_or_default(),
        }
    }
}

impl HtmlPath {
    /// The empty path: content passes through unwrapped.
    pub fn empty() -> Self {
        HtmlPath::Elements(Vec::new())
    }

    /// A path of plain collapsible elements.
    pub fn elements(tag_names: &[&str]) -> Self {
        HtmlPath::Elements(
            tag_names
                .iter()
                .map(|tag_name| HtmlPathElement::new(*tag_name))
                .collect(),
        )
    }

    /// Wrap lazily-produced content in this path.
    ///
    /// The closure is not called for [`HtmlPath::Ignore`], so side effects of
    /// producing the content (note references, comment collection) only
    /// happen when the content is kept.
    pub fn wrap(&self, children: impl FnOnce() -> Vec<HtmlNode>) -> Vec<HtmlNode> {
        match self {
            HtmlPath::Ignore => Vec::new(),
            HtmlPath::Elements(elements) => {
                let mut nodes = children();
                for element in elements.iter().rev() {
                    nodes = vec![element_with_tag(element.tag(), nodes)];
                }
                nodes
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{text, HtmlNode};

    #[test]
    fn test_empty_path_passes_content_through() {
        let wrapped = HtmlPath::empty().wrap(|| vec![text("content")]);
        assert_eq!(wrapped, vec![text("content")]);
    }

    #[test]
    fn test_nested_path_wraps_innermost_last() {
        let wrapped = HtmlPath::elements(&["ul", "li"]).wrap(|| vec![text("item")]);
        let [HtmlNode::Element(list)] = wrapped.as_slice() else {
            panic!("expected a single element");
        };
        assert_eq!(list.tag.tag_name(), "ul");
        let [HtmlNode::Element(item)] = list.children.as_slice() else {
            panic!("expected a nested element");
        };
        assert_eq!(item.tag.tag_name(), "li");
        assert_eq!(item.children, vec![text("item")]);
    }

    #[test]
    fn test_ignore_path_skips_content_production() {
        let mut produced = false;
        let wrapped = HtmlPath::Ignore.wrap(|| {
            produced = true;
            vec![text("content")]
        });
        assert!(wrapped.is_empty());
        assert!(!produced);
    }
}
