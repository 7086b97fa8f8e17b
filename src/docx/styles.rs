//! The style lookup table.
//!
//! The XML part reader that populates this table lives outside the core; the
//! readers here only consume its query interface, one find method per style
//! category.

use std::collections::HashMap;

/// A style definition: the id it is referenced by and its display name.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub style_id: String,
    pub name: Option<String>,
}

/// A numbering style: a named alias for a concrete numbering instance.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberingStyle {
    pub num_id: Option<String>,
}

/// Styles of a document, grouped by category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Styles {
    paragraph_styles: HashMap<String, Style>,
    character_styles: HashMap<String, Style>,
    table_styles: HashMap<String, Style>,
    numbering_styles: HashMap<String, NumberingStyle>,
}

impl Styles {
    pub fn new(
        paragraph_styles: Vec<Style>,
        character_styles: Vec<Style>,
        table_styles: Vec<Style>,
        numbering_styles: Vec<(String, NumberingStyle)>,
    ) -> Self {
        fn index(styles: Vec<Style>) -> HashMap<String, Style> {
            styles
                .into_iter()
                .map(|style| (style.style_id.clone(), style))
                .collect()
        }
        Self {
            paragraph_styles: index(paragraph_styles),
            character_styles: index(character_styles),
            table_styles: index(table_styles),
            numbering_styles: numbering_styles.into_iter().collect(),
        }
    }

    pub fn find_paragraph_style_by_id(&self, style_id: &str) -> Option<&Style> {
        self.paragraph_styles.get(style_id)
    }

    pub fn find_character_style_by_id(&self, style_id: &str) -> Option<&Style> {
        self.character_styles.get(style_id)
    }

    pub fn find_table_style_by_id(&self, style_id: &str) -> Option<&Style> {
        self.table_styles.get(style_id)
    }

    pub fn find_numbering_style_by_id(&self, style_id: &str) -> Option<&NumberingStyle> {
        self.numbering_styles.get(style_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styles_are_looked_up_per_category() {
        let styles = Styles::new(
            vec![Style {
                style_id: "Heading1".to_string(),
                name: Some("Heading 1".to_string()),
            }],
            vec![Style {
                style_id: "Emphasis".to_string(),
                name: Some("Emphasis".to_string()),
            }],
            vec![],
            vec![],
        );
        assert_eq!(
            styles
                .find_paragraph_style_by_id("Heading1")
                .and_then(|style| style.name.as_deref()),
            Some("Heading 1")
        );
        assert!(styles.find_paragraph_style_by_id("Emphasis").is_none());
        assert!(styles.find_character_style_by_id("Emphasis").is_some());
        assert!(styles.find_table_style_by_id("Heading1").is_none());
    }
}
