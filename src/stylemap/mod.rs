//! The style-mapping language: matchers on the left, output paths on the
//! right.
//!
//! ```text
//! p.Heading1 => h1:fresh
//! p[style-name='Quote'] => blockquote > p:fresh
//! r[style-name='Hidden'] => !
//! ```
//!
//! A mapping that cannot be parsed is dropped with a warning naming the
//! character the parse failed at; the rest of the map stays usable.

mod matchers;
mod parser;
mod tokenizer;

pub use matchers::{
    DocumentMatcher, ElementMatcher, ListMatcher, MatchTarget, RunFlag, StringMatcher,
};

use once_cell::sync::Lazy;

use crate::common::{Message, WithMessages};
use crate::html::paths::HtmlPath;

/// One line of the map: a matcher and the path its content is written into.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleMapping {
    pub matcher: DocumentMatcher,
    pub path: HtmlPath,
}

/// An ordered list of mappings; the first match wins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleMap {
    mappings: Vec<StyleMapping>,
}

impl StyleMap {
    pub fn new(mappings: Vec<StyleMapping>) -> Self {
        Self { mappings }
    }

    /// The path of the first mapping matching the target, if any.
    pub fn find(&self, target: &MatchTarget<'_>) -> Option<&HtmlPath> {
        self.mappings
            .iter()
            .find(|mapping| mapping.matcher.matches(target))
            .map(|mapping| &mapping.path)
    }

    /// Chain two maps; mappings in `self` take precedence.
    pub fn followed_by(&self, fallback: &StyleMap) -> StyleMap {
        let mut mappings = self.mappings.clone();
        mappings.extend(fallback.mappings.iter().cloned());
        StyleMap { mappings }
    }
}

/// Parse a single mapping line.
pub fn read_style(line: &str) -> WithMessages<Option<StyleMapping>> {
    match parser::parse_style(line) {
        Ok(mapping) => WithMessages::new(Some(mapping)),
        Err(error) => WithMessages::with(
            None,
            vec![Message::warning(format!(
                "Did not understand this style mapping, so ignored it: {line}\n\
                 Error was at character number {}: Expected {} but got {}",
                error.char_index + 1,
                error.expected,
                error.actual
            ))],
        ),
    }
}

/// Parse a multi-line style map.
///
/// Blank lines and lines starting with `#` are skipped; unparseable lines
/// are dropped with a warning each.
pub fn read_style_map(text: &str) -> WithMessages<StyleMap> {
    let mut mappings = Vec::new();
    let mut messages = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let result = read_style(line);
        messages.extend(result.messages);
        if let Some(mapping) = result.value {
            mappings.push(mapping);
        }
    }
    WithMessages::with(StyleMap::new(mappings), messages)
}

/// The built-in mappings applied after any user-supplied map.
pub static DEFAULT_STYLE_MAP: Lazy<StyleMap> = Lazy::new(|| {
    read_style_map(
        "\
p.Heading1 => h1:fresh
p.Heading2 => h2:fresh
p.Heading3 => h3:fresh
p.Heading4 => h4:fresh
p.Heading5 => h5:fresh
p.Heading6 => h6:fresh
p[style-name='Heading 1'] => h1:fresh
p[style-name='Heading 2'] => h2:fresh
p[style-name='Heading 3'] => h3:fresh
p[style-name='Heading 4'] => h4:fresh
p[style-name='Heading 5'] => h5:fresh
p[style-name='Heading 6'] => h6:fresh
r[style-name='Strong'] => strong
p[style-name='footnote text'] => p:fresh
r[style-name='footnote reference'] => sup
p[style-name='endnote text'] => p:fresh
r[style-name='endnote reference'] => sup
p[style-name='annotation text'] => p:fresh
r[style-name='annotation reference'] => sup
p:unordered-list(1) => ul > li:fresh
p:unordered-list(2) => ul|ol > li > ul > li:fresh
p:unordered-list(3) => ul|ol > li > ul|ol > li > ul > li:fresh
p:unordered-list(4) => ul|ol > li > ul|ol > li > ul|ol > li > ul > li:fresh
p:unordered-list(5) => ul|ol > li > ul|ol > li > ul|ol > li > ul|ol > li > ul > li:fresh
p:ordered-list(1) => ol > li:fresh
p:ordered-list(2) => ul|ol > li > ol > li:fresh
p:ordered-list(3) => ul|ol > li > ul|ol > li > ol > li:fresh
p:ordered-list(4) => ul|ol > li > ul|ol > li > ul|ol > li > ol > li:fresh
p:ordered-list(5) => ul|ol > li > ul|ol > li > ul|ol > li > ul|ol > li > ol > li:fresh
r[style-name='Hyperlink'] =>
p[style-name='Normal'] => p:fresh
",
    )
    .value
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{Paragraph, StyleRef};

    #[test]
    fn test_bad_lines_warn_and_are_dropped() {
        let result = read_style_map("p => h1\nr => span a\n");
        assert_eq!(result.value.mappings.len(), 1);
        assert_eq!(
            result.messages,
            vec![Message::warning(
                "Did not understand this style mapping, so ignored it: r => span a\n\
                 Error was at character number 10: Expected end but got whitespace"
            )]
        );
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let result = read_style_map("# a comment\n\np => p:fresh\n");
        assert!(result.messages.is_empty());
        assert_eq!(result.value.mappings.len(), 1);
    }

    #[test]
    fn test_first_matching_mapping_wins() {
        let map = read_style_map("p.A => h1\np => h2\n").value;
        let styled = Paragraph {
            children: vec![],
            style: StyleRef {
                style_id: Some("A".to_string()),
                style_name: None,
            },
            alignment: None,
            numbering: None,
            indent: Default::default(),
        };
        let path = map.find(&MatchTarget::Paragraph(&styled));
        assert_eq!(path, Some(&HtmlPath::elements(&["h1"])));
    }

    #[test]
    fn test_default_style_map_parses_cleanly() {
        assert!(!DEFAULT_STYLE_MAP.mappings.is_empty());
        let heading = Paragraph {
            children: vec![],
            style: StyleRef {
                style_id: Some("Heading1".to_string()),
                style_name: Some("heading 1".to_string()),
            },
            alignment: None,
            numbering: None,
            indent: Default::default(),
        };
        assert!(DEFAULT_STYLE_MAP
            .find(&MatchTarget::Paragraph(&heading))
            .is_some());
    }
}
