//! The numbering lookup table.
//!
//! Numbering in WordprocessingML is doubly indirect: a paragraph references a
//! numbering instance (`numId`), which references an abstract definition,
//! which may itself be an alias (`numStyleLink`) for a numbering style that
//! points back at another instance. The query surface resolves all of that to
//! a flat [`NumberingLevel`].

use std::collections::{HashMap, HashSet};

use super::styles::Styles;

/// A resolved numbering level: list kind plus 0-based nesting depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingLevel {
    pub is_ordered: bool,
    pub level_index: u64,
}

/// One level of an abstract numbering definition.
#[derive(Debug, Clone, PartialEq)]
pub struct AbstractNumLevel {
    pub level_index: u64,
    pub is_ordered: bool,
    /// Set when this level is bound to a paragraph style, which gives that
    /// style's paragraphs this numbering without an explicit `numPr`.
    pub paragraph_style_id: Option<String>,
}

/// An abstract numbering definition: its levels, or an alias to a numbering
/// style that carries the real definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AbstractNum {
    pub levels: Vec<AbstractNumLevel>,
    pub num_style_link: Option<String>,
}

/// The document's numbering definitions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Numbering {
    /// numId → abstractNumId
    nums: HashMap<String, String>,
    abstract_nums: HashMap<String, AbstractNum>,
    levels_by_paragraph_style_id: HashMap<String, NumberingLevel>,
    /// numbering style id → numId, snapshot of the styles table so alias
    /// resolution stays read-only at query time.
    num_ids_by_style_id: HashMap<String, String>,
}

impl Numbering {
    /// Build the lookup table.
    ///
    /// Requires the styles table because abstract definitions may alias
    /// numbering styles, and those aliases are resolved up front so queries
    /// stay read-only.
    pub fn new(
        nums: HashMap<String, String>,
        abstract_nums: HashMap<String, AbstractNum>,
        styles: &Styles,
    ) -> Self {
        let levels_by_paragraph_style_id = abstract_nums
            .values()
            .flat_map(|abstract_num| &abstract_num.levels)
            .filter_map(|level| {
                level.paragraph_style_id.as_ref().map(|style_id| {
                    (
                        style_id.clone(),
                        NumberingLevel {
                            is_ordered: level.is_ordered,
                            level_index: level.level_index,
                        },
                    )
                })
            })
            .collect();

        let num_ids_by_style_id = abstract_nums
            .values()
            .filter_map(|abstract_num| abstract_num.num_style_link.as_deref())
            .filter_map(|style_id| {
                let style = styles.find_numbering_style_by_id(style_id)?;
                let num_id = style.num_id.clone()?;
                Some((style_id.to_string(), num_id))
            })
            .collect();

        Self {
            nums,
            abstract_nums,
            levels_by_paragraph_style_id,
            num_ids_by_style_id,
        }
    }

    /// Resolve an explicit numbering reference to a level.
    ///
    /// Style-link aliases are followed iteratively; a cycle or a dangling
    /// link resolves to no numbering.
    pub fn find_level(&self, num_id: &str, level_index: u64) -> Option<NumberingLevel> {
        let mut num_id = num_id;
        let mut visited = HashSet::new();
        loop {
            if !visited.insert(num_id) {
                return None;
            }
            let abstract_num_id = self.nums.get(num_id)?;
            let abstract_num = self.abstract_nums.get(abstract_num_id)?;
            match abstract_num.num_style_link.as_deref() {
                None => {
                    let level = abstract_num
                        .levels
                        .iter()
                        .find(|level| level.level_index == level_index)?;
                    return Some(NumberingLevel {
                        is_ordered: level.is_ordered,
                        level_index: level.level_index,
                    });
                }
                Some(style_id) => {
                    num_id = self.num_ids_by_style_id.get(style_id)?;
                }
            }
        }
    }

    /// The level bound to a paragraph style, if any.
    pub fn find_level_by_paragraph_style_id(&self, style_id: &str) -> Option<NumberingLevel> {
        self.levels_by_paragraph_style_id.get(style_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::styles::NumberingStyle;

    fn ordered_level(level_index: u64) -> AbstractNumLevel {
        AbstractNumLevel {
            level_index,
            is_ordered: true,
            paragraph_style_id: None,
        }
    }

    #[test]
    fn test_find_level_resolves_num_to_abstract_num() {
        let numbering = Numbering::new(
            HashMap::from([("42".to_string(), "100".to_string())]),
            HashMap::from([(
                "100".to_string(),
                AbstractNum {
                    levels: vec![ordered_level(0), ordered_level(1)],
                    num_style_link: None,
                },
            )]),
            &Styles::default(),
        );
        assert_eq!(
            numbering.find_level("42", 1),
            Some(NumberingLevel {
                is_ordered: true,
                level_index: 1
            })
        );
        assert_eq!(numbering.find_level("42", 2), None);
        assert_eq!(numbering.find_level("43", 0), None);
    }

    #[test]
    fn test_find_level_follows_num_style_link() {
        let styles = Styles::new(
            vec![],
            vec![],
            vec![],
            vec![(
                "ListStyle".to_string(),
                NumberingStyle {
                    num_id: Some("200".to_string()),
                },
            )],
        );
        let numbering = Numbering::new(
            HashMap::from([
                ("42".to_string(), "100".to_string()),
                ("200".to_string(), "101".to_string()),
            ]),
            HashMap::from([
                (
                    "100".to_string(),
                    AbstractNum {
                        levels: vec![],
                        num_style_link: Some("ListStyle".to_string()),
                    },
                ),
                (
                    "101".to_string(),
                    AbstractNum {
                        levels: vec![ordered_level(0)],
                        num_style_link: None,
                    },
                ),
            ]),
            &styles,
        );
        assert_eq!(
            numbering.find_level("42", 0),
            Some(NumberingLevel {
                is_ordered: true,
                level_index: 0
            })
        );
    }

    #[test]
    fn test_cyclic_style_links_resolve_to_no_numbering() {
        let styles = Styles::new(
            vec![],
            vec![],
            vec![],
            vec![(
                "Loop".to_string(),
                NumberingStyle {
                    num_id: Some("42".to_string()),
                },
            )],
        );
        let numbering = Numbering::new(
            HashMap::from([("42".to_string(), "100".to_string())]),
            HashMap::from([(
                "100".to_string(),
                AbstractNum {
                    levels: vec![],
                    num_style_link: Some("Loop".to_string()),
                },
            )]),
            &styles,
        );
        assert_eq!(numbering.find_level("42", 0), None);
    }

    #[test]
    fn test_find_level_by_paragraph_style_id() {
        let numbering = Numbering::new(
            HashMap::new(),
            HashMap::from([(
                "100".to_string(),
                AbstractNum {
                    levels: vec![AbstractNumLevel {
                        level_index: 0,
                        is_ordered: false,
                        paragraph_style_id: Some("ListBullet".to_string()),
                    }],
                    num_style_link: None,
                },
            )]),
            &Styles::default(),
        );
        assert_eq!(
            numbering.find_level_by_paragraph_style_id("ListBullet"),
            Some(NumberingLevel {
                is_ordered: false,
                level_index: 0
            })
        );
        assert_eq!(numbering.find_level_by_paragraph_style_id("Body"), None);
    }
}
