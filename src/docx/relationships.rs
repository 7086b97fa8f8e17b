//! The relationship lookup table.
//!
//! Relationship parts map `r:id` values to targets (URIs or part paths).
//! The XML reader that produces them is external; this is the query surface
//! the body reader consumes.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub relationship_id: String,
    pub target: String,
    pub type_uri: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Relationships {
    targets_by_id: HashMap<String, String>,
    targets_by_type: HashMap<String, Vec<String>>,
}

impl Relationships {
    pub fn new(relationships: Vec<Relationship>) -> Self {
        let mut targets_by_id = HashMap::new();
        let mut targets_by_type: HashMap<String, Vec<String>> = HashMap::new();
        for relationship in relationships {
            targets_by_id.insert(relationship.relationship_id, relationship.target.clone());
            targets_by_type
                .entry(relationship.type_uri)
                .or_default()
                .push(relationship.target);
        }
        Self {
            targets_by_id,
            targets_by_type,
        }
    }

    pub fn find_target_by_relationship_id(&self, relationship_id: &str) -> Option<&str> {
        self.targets_by_id.get(relationship_id).map(String::as_str)
    }

    pub fn find_targets_by_type(&self, type_uri: &str) -> &[String] {
        self.targets_by_type
            .get(type_uri)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
