//! Normalization of the output tree.
//!
//! Two passes: drop nodes that would serialize to nothing, then collapse
//! adjacent collapsible elements into one. Collapsing is what turns one list
//! item per source paragraph into a single list.

use super::HtmlNode;

pub fn simplify(nodes: Vec<HtmlNode>) -> Vec<HtmlNode> {
    collapse(remove_empty(nodes))
}

fn remove_empty(nodes: Vec<HtmlNode>) -> Vec<HtmlNode> {
    nodes
        .into_iter()
        .filter_map(|node| match node {
            HtmlNode::Text(value) => (!value.is_empty()).then_some(HtmlNode::Text(value)),
            HtmlNode::Element(mut element) => {
                element.children = remove_empty(element.children);
                (element.tag.is_void() || !element.children.is_empty())
                    .then_some(HtmlNode::Element(element))
            }
            keep @ (HtmlNode::ForceWrite | HtmlNode::Deferred(_)) => Some(keep),
        })
        .collect()
}

fn collapse(nodes: Vec<HtmlNode>) -> Vec<HtmlNode> {
    let mut collapsed = Vec::with_capacity(nodes.len());
    for node in nodes {
        append_node(&mut collapsed, node);
    }
    collapsed
}

fn append_node(collapsed: &mut Vec<HtmlNode>, mut node: HtmlNode) {
    if let HtmlNode::Element(element) = &mut node {
        element.children = collapse(std::mem::take(&mut element.children));
    }

    let mergeable = match (collapsed.last(), &node) {
        (Some(HtmlNode::Element(last)), HtmlNode::Element(element)) => {
            element.collapsible_into(last)
        }
        _ => false,
    };
    if mergeable {
        let HtmlNode::Element(element) = node else {
            return;
        };
        let Some(HtmlNode::Element(last)) = collapsed.last_mut() else {
            return;
        };
        if !element.tag.separator.is_empty() {
            last.children
                .push(HtmlNode::Text(element.tag.separator.clone()));
        }
        for child in element.children {
            append_node(&mut last.children, child);
        }
    } else {
        collapsed.push(node);
    }
}
