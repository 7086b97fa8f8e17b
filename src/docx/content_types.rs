//! The content-type lookup table.
//!
//! Maps part paths to MIME content types, first through explicit per-path
//! overrides and then through extension defaults. Image extensions common in
//! documents are pre-seeded so a missing `[Content_Types].xml` still yields
//! sensible types.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ContentTypes {
    overrides: HashMap<String, String>,
    extension_defaults: HashMap<String, String>,
}

impl ContentTypes {
    pub fn new(
        overrides: HashMap<String, String>,
        mut extension_defaults: HashMap<String, String>,
    ) -> Self {
        for (extension, content_type) in [
            ("png", "image/png"),
            ("gif", "image/gif"),
            ("jpeg", "image/jpeg"),
            ("jpg", "image/jpeg"),
            ("tif", "image/tiff"),
            ("tiff", "image/tiff"),
            ("bmp", "image/bmp"),
        ] {
            extension_defaults
                .entry(extension.to_string())
                .or_insert_with(|| content_type.to_string());
        }
        Self {
            overrides,
            extension_defaults,
        }
    }

    /// The content type of a part path, if known.
    pub fn find_content_type(&self, path: &str) -> Option<&str> {
        if let Some(content_type) = self.overrides.get(path) {
            return Some(content_type);
        }
        let extension = path.rsplit('.').next()?.to_ascii_lowercase();
        self.extension_defaults
            .get(&extension)
            .map(String::as_str)
    }
}

impl Default for ContentTypes {
    fn default() -> Self {
        Self::new(HashMap::new(), HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_defaults_are_case_insensitive() {
        let content_types = ContentTypes::default();
        assert_eq!(
            content_types.find_content_type("word/media/hat.PNG"),
            Some("image/png")
        );
        assert_eq!(content_types.find_content_type("word/media/hat.emf"), None);
    }

    #[test]
    fn test_overrides_take_precedence_over_extensions() {
        let overrides = HashMap::from([(
            "word/media/hat.png".to_string(),
            "image/x-custom".to_string(),
        )]);
        let content_types = ContentTypes::new(overrides, HashMap::new());
        assert_eq!(
            content_types.find_content_type("word/media/hat.png"),
            Some("image/x-custom")
        );
    }
}
