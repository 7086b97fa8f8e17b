//! URI helpers for relationship targets.

/// Convert a relationship target into an archive entry name.
///
/// Absolute targets (`/word/media/x.png`) are archive-rooted; relative ones
/// are resolved against the base part directory.
pub(crate) fn uri_to_zip_entry_name(base: &str, uri: &str) -> String {
    match uri.strip_prefix('/') {
        Some(rooted) => rooted.to_string(),
        None => format!("{base}/{uri}"),
    }
}

/// Replace (or append) the fragment of a URI.
pub(crate) fn replace_fragment(uri: &str, fragment: &str) -> String {
    let base = match uri.find('#') {
        Some(index) => &uri[..index],
        None => uri,
    };
    format!("{base}#{fragment}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_uri_is_resolved_against_base() {
        assert_eq!(
            uri_to_zip_entry_name("word", "media/image1.png"),
            "word/media/image1.png"
        );
    }

    #[test]
    fn test_absolute_uri_is_archive_rooted() {
        assert_eq!(
            uri_to_zip_entry_name("word", "/word/media/image1.png"),
            "word/media/image1.png"
        );
    }

    #[test]
    fn test_existing_fragment_is_replaced() {
        assert_eq!(
            replace_fragment("http://example.com/#old", "new"),
            "http://example.com/#new"
        );
        assert_eq!(
            replace_fragment("http://example.com/", "start"),
            "http://example.com/#start"
        );
    }
}
