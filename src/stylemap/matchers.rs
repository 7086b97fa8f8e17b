//! Matchers: the left-hand side of a style mapping.

use crate::docx::{BreakKind, NumberingLevel, Paragraph, Run, StyleRef, Table};

/// A run formatting flag a mapping can target directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunFlag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    AllCaps,
    SmallCaps,
}

/// What a mapping matches against.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentMatcher {
    Paragraph(ElementMatcher),
    Run(ElementMatcher),
    Table(ElementMatcher),
    Flag(RunFlag),
    CommentReference,
    Break(BreakKind),
}

/// The view of a document element a matcher is tested against.
#[derive(Debug, Clone, Copy)]
pub enum MatchTarget<'a> {
    Paragraph(&'a Paragraph),
    Run(&'a Run),
    Table(&'a Table),
    Flag(RunFlag),
    CommentReference,
    Break(BreakKind),
}

impl DocumentMatcher {
    pub fn matches(&self, target: &MatchTarget<'_>) -> bool {
        match (self, target) {
            (DocumentMatcher::Paragraph(matcher), MatchTarget::Paragraph(paragraph)) => {
                matcher.matches_style(&paragraph.style)
                    && matcher.matches_list(paragraph.numbering.as_ref())
            }
            (DocumentMatcher::Run(matcher), MatchTarget::Run(run)) => {
                matcher.matches_style(&run.style)
            }
            (DocumentMatcher::Table(matcher), MatchTarget::Table(table)) => {
                matcher.matches_style(&table.style)
            }
            (DocumentMatcher::Flag(flag), MatchTarget::Flag(target_flag)) => flag == target_flag,
            (DocumentMatcher::CommentReference, MatchTarget::CommentReference) => true,
            (DocumentMatcher::Break(kind), MatchTarget::Break(target_kind)) => kind == target_kind,
            _ => false,
        }
    }
}

/// Conditions on a styled element (paragraph, run or table).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementMatcher {
    pub style_id: Option<String>,
    pub style_name: Option<StringMatcher>,
    /// Numbering condition; only meaningful for paragraphs.
    pub list: Option<ListMatcher>,
}

impl ElementMatcher {
    fn matches_style(&self, style: &StyleRef) -> bool {
        if let Some(style_id) = &self.style_id {
            if style.style_id.as_deref() != Some(style_id.as_str()) {
                return false;
            }
        }
        if let Some(matcher) = &self.style_name {
            // An element with no resolved style name matches no name condition.
            match &style.style_name {
                Some(style_name) => {
                    if !matcher.matches(style_name) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        true
    }

    fn matches_list(&self, numbering: Option<&NumberingLevel>) -> bool {
        match &self.list {
            None => true,
            Some(list) => numbering.is_some_and(|level| {
                level.is_ordered == list.is_ordered && level.level_index == list.level_index
            }),
        }
    }
}

/// A string condition on a style name. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub enum StringMatcher {
    EqualTo(String),
    StartsWith(String),
}

impl StringMatcher {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            StringMatcher::EqualTo(expected) => {
                value.to_lowercase() == expected.to_lowercase()
            }
            StringMatcher::StartsWith(prefix) => {
                value.to_lowercase().starts_with(&prefix.to_lowercase())
            }
        }
    }
}

/// A numbering condition: list kind plus 0-based level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMatcher {
    pub is_ordered: bool,
    pub level_index: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled_paragraph(style_id: Option<&str>, style_name: Option<&str>) -> Paragraph {
        Paragraph {
            children: vec![],
            style: StyleRef {
                style_id: style_id.map(str::to_string),
                style_name: style_name.map(str::to_string),
            },
            alignment: None,
            numbering: None,
            indent: Default::default(),
        }
    }

    #[test]
    fn test_style_name_matching_is_case_insensitive() {
        let matcher = DocumentMatcher::Paragraph(ElementMatcher {
            style_name: Some(StringMatcher::EqualTo("heading 1".to_string())),
            ..ElementMatcher::default()
        });
        let paragraph = styled_paragraph(Some("Heading1"), Some("Heading 1"));
        assert!(matcher.matches(&MatchTarget::Paragraph(&paragraph)));
    }

    #[test]
    fn test_style_name_condition_requires_a_resolved_name() {
        let matcher = DocumentMatcher::Paragraph(ElementMatcher {
            style_name: Some(StringMatcher::EqualTo("Heading 1".to_string())),
            ..ElementMatcher::default()
        });
        let paragraph = styled_paragraph(Some("Heading1"), None);
        assert!(!matcher.matches(&MatchTarget::Paragraph(&paragraph)));
    }

    #[test]
    fn test_starts_with_matches_prefix_only() {
        let matcher = StringMatcher::StartsWith("Heading".to_string());
        assert!(matcher.matches("heading 1"));
        assert!(!matcher.matches("Sub Heading"));
    }

    #[test]
    fn test_list_condition_requires_matching_numbering() {
        let matcher = DocumentMatcher::Paragraph(ElementMatcher {
            list: Some(ListMatcher {
                is_ordered: true,
                level_index: 0,
            }),
            ..ElementMatcher::default()
        });
        let mut paragraph = styled_paragraph(None, None);
        assert!(!matcher.matches(&MatchTarget::Paragraph(&paragraph)));
        paragraph.numbering = Some(NumberingLevel {
            is_ordered: true,
            level_index: 0,
        });
        assert!(matcher.matches(&MatchTarget::Paragraph(&paragraph)));
        paragraph.numbering = Some(NumberingLevel {
            is_ordered: false,
            level_index: 0,
        });
        assert!(!matcher.matches(&MatchTarget::Paragraph(&paragraph)));
    }

    #[test]
    fn test_matchers_only_match_their_own_kind() {
        let matcher = DocumentMatcher::Paragraph(ElementMatcher::default());
        let run = Run::default();
        assert!(!matcher.matches(&MatchTarget::Run(&run)));
        assert!(DocumentMatcher::Flag(RunFlag::Bold).matches(&MatchTarget::Flag(RunFlag::Bold)));
        assert!(!DocumentMatcher::Flag(RunFlag::Bold).matches(&MatchTarget::Flag(RunFlag::Italic)));
    }
}
