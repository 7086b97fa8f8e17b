//! Serializing the output tree to HTML or Markdown text.

use super::{HtmlElement, HtmlNode};

/// The text format a conversion produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Html,
    Markdown,
}

pub fn write(format: OutputFormat, nodes: &[HtmlNode]) -> String {
    match format {
        OutputFormat::Html => write_html(nodes),
        OutputFormat::Markdown => write_markdown(nodes),
    }
}

pub fn write_html(nodes: &[HtmlNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_html_node(&mut out, node);
    }
    out
}

fn write_html_node(out: &mut String, node: &HtmlNode) {
    match node {
        HtmlNode::Text(value) => escape_html_text(out, value),
        HtmlNode::Element(element) => write_html_element(out, element),
        HtmlNode::ForceWrite | HtmlNode::Deferred(_) => {}
    }
}

fn write_html_element(out: &mut String, element: &HtmlElement) {
    let tag_name = element.tag.tag_name();
    out.push('<');
    out.push_str(tag_name);
    for (name, value) in &element.tag.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_html_attribute(out, value);
        out.push('"');
    }
    if element.tag.is_void() {
        out.push_str(" />");
        return;
    }
    out.push('>');
    for child in &element.children {
        write_html_node(out, child);
    }
    out.push_str("</");
    out.push_str(tag_name);
    out.push('>');
}

fn escape_html_text(out: &mut String, value: &str) {
    for character in value.chars() {
        match character {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
}

fn escape_html_attribute(out: &mut String, value: &str) {
    for character in value.chars() {
        match character {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
}

pub fn write_markdown(nodes: &[HtmlNode]) -> String {
    let mut writer = MarkdownWriter::default();
    writer.write_nodes(nodes);
    writer.out
}

#[derive(Debug, Clone)]
struct ListState {
    is_ordered: bool,
    indent: usize,
    count: u64,
}

#[derive(Debug, Default)]
struct MarkdownWriter {
    out: String,
    list_stack: Vec<ListState>,
}

impl MarkdownWriter {
    fn write_nodes(&mut self, nodes: &[HtmlNode]) {
        for node in nodes {
            self.write_node(node);
        }
    }

    fn write_node(&mut self, node: &HtmlNode) {
        match node {
            HtmlNode::Text(value) => self.out.push_str(value),
            HtmlNode::Element(element) => self.write_element(element),
            HtmlNode::ForceWrite | HtmlNode::Deferred(_) => {}
        }
    }

    fn write_element(&mut self, element: &HtmlElement) {
        match element.tag.tag_name() {
            "p" => {
                self.write_nodes(&element.children);
                self.out.push_str("\n\n");
            }
            "br" => self.out.push_str("  \n"),
            heading @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                let depth = heading.as_bytes()[1] - b'0';
                for _ in 0..depth {
                    self.out.push('#');
                }
                self.out.push(' ');
                self.write_nodes(&element.children);
                self.out.push_str("\n\n");
            }
            "strong" | "b" => self.write_wrapped("__", &element.children),
            "em" | "i" => self.write_wrapped("*", &element.children),
            "a" => match element.tag.attributes.get("href") {
                Some(href) => {
                    self.out.push('[');
                    self.write_nodes(&element.children);
                    self.out.push_str("](");
                    self.out.push_str(href);
                    self.out.push(')');
                }
                None => self.write_nodes(&element.children),
            },
            "img" => {
                let attributes = &element.tag.attributes;
                self.out.push_str("![");
                self.out
                    .push_str(attributes.get("alt").map(String::as_str).unwrap_or(""));
                self.out.push_str("](");
                self.out
                    .push_str(attributes.get("src").map(String::as_str).unwrap_or(""));
                self.out.push(')');
            }
            list @ ("ul" | "ol") => {
                let indent = self.list_stack.len();
                // A nested list starts on its own line, below the item text.
                if indent > 0 && !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
                self.list_stack.push(ListState {
                    is_ordered: list == "ol",
                    indent,
                    count: 0,
                });
                self.write_nodes(&element.children);
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.out.push('\n');
                }
            }
            "li" => {
                let (prefix, indent) = match self.list_stack.last_mut() {
                    Some(list) => {
                        list.count += 1;
                        let prefix = if list.is_ordered {
                            format!("{}.", list.count)
                        } else {
                            "-".to_string()
                        };
                        (prefix, list.indent)
                    }
                    None => ("-".to_string(), 0),
                };
                for _ in 0..indent {
                    self.out.push('\t');
                }
                self.out.push_str(&prefix);
                self.out.push(' ');
                self.write_nodes(&element.children);
                if !self.out.ends_with('\n') {
                    self.out.push('\n');
                }
            }
            // Anything without a Markdown equivalent contributes its content
            // only.
            _ => self.write_nodes(&element.children),
        }
    }

    fn write_wrapped(&mut self, marker: &str, children: &[HtmlNode]) {
        self.out.push_str(marker);
        self.write_nodes(children);
        self.out.push_str(marker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{attributes, fresh_element, non_fresh_element, text};

    #[test]
    fn test_html_text_is_escaped() {
        let nodes = vec![non_fresh_element(
            "p",
            attributes(&[]),
            vec![text("1 < 2 & 3 > 2")],
        )];
        assert_eq!(write_html(&nodes), "<p>1 &lt; 2 &amp; 3 &gt; 2</p>");
    }

    #[test]
    fn test_html_attributes_are_escaped_and_sorted() {
        let nodes = vec![fresh_element(
            "a",
            attributes(&[("href", "http://example.com/?a=1&b=\"2\"")]),
            vec![text("link")],
        )];
        assert_eq!(
            write_html(&nodes),
            "<a href=\"http://example.com/?a=1&amp;b=&quot;2&quot;\">link</a>"
        );
    }

    #[test]
    fn test_void_elements_are_self_closing() {
        let nodes = vec![
            fresh_element("br", attributes(&[]), vec![]),
            fresh_element("img", attributes(&[("src", "x.png")]), vec![]),
        ];
        assert_eq!(write_html(&nodes), "<br /><img src=\"x.png\" />");
    }

    #[test]
    fn test_force_write_markers_produce_no_output() {
        let nodes = vec![non_fresh_element(
            "p",
            attributes(&[]),
            vec![crate::html::HtmlNode::ForceWrite, text("x")],
        )];
        assert_eq!(write_html(&nodes), "<p>x</p>");
    }

    #[test]
    fn test_markdown_paragraphs_and_emphasis() {
        let nodes = vec![non_fresh_element(
            "p",
            attributes(&[]),
            vec![
                non_fresh_element("strong", attributes(&[]), vec![text("Bold")]),
                text(" and "),
                non_fresh_element("em", attributes(&[]), vec![text("italic")]),
            ],
        )];
        assert_eq!(write_markdown(&nodes), "__Bold__ and *italic*\n\n");
    }

    #[test]
    fn test_markdown_nested_lists_are_indented() {
        let nodes = vec![non_fresh_element(
            "ol",
            attributes(&[]),
            vec![
                non_fresh_element(
                    "li",
                    attributes(&[]),
                    vec![
                        text("one"),
                        non_fresh_element(
                            "ul",
                            attributes(&[]),
                            vec![non_fresh_element("li", attributes(&[]), vec![text("nested")])],
                        ),
                    ],
                ),
                non_fresh_element("li", attributes(&[]), vec![text("two")]),
            ],
        )];
        assert_eq!(write_markdown(&nodes), "1. one\n\t- nested\n2. two\n\n");
    }

    #[test]
    fn test_markdown_links_and_images() {
        let nodes = vec![
            fresh_element(
                "a",
                attributes(&[("href", "http://example.com/")]),
                vec![text("link")],
            ),
            fresh_element(
                "img",
                attributes(&[("alt", "alt text"), ("src", "data:x")]),
                vec![],
            ),
        ];
        assert_eq!(
            write_markdown(&nodes),
            "[link](http://example.com/)![alt text](data:x)"
        );
    }
}
