//! Reading of the main document part.

use crate::common::{Error, Result, WithMessages};
use crate::xml::XmlElement;

use super::body::BodyReader;
use super::document::{Comment, Document, Notes};

/// Read a `w:document` root into a [`Document`].
///
/// The only fatal condition in the whole reading pipeline: a root without a
/// `w:body` means the input is not a document at all.
pub fn read_document(
    reader: &mut BodyReader<'_>,
    root: &XmlElement,
    notes: Notes,
    comments: Vec<Comment>,
) -> Result<WithMessages<Document>> {
    let body = root.first("w:body").ok_or(Error::MissingBody)?;
    let result = reader.read_elements(&body.children);
    let mut children = result.elements;
    children.extend(result.extra);
    Ok(WithMessages::with(
        Document {
            children,
            notes,
            comments,
        },
        result.messages,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::test_support::{attrs, reader_fixture};
    use crate::docx::DocumentElement;
    use crate::xml::element;

    #[test]
    fn test_missing_body_is_fatal() {
        let fixture = reader_fixture();
        let mut reader = fixture.reader();
        let root = XmlElement::new("w:document", attrs(&[]), vec![]);
        let error = read_document(&mut reader, &root, Notes::default(), Vec::new()).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Could not find the body element: are you sure this is a docx file?"
        );
    }

    #[test]
    fn test_body_children_become_document_children() {
        let fixture = reader_fixture();
        let mut reader = fixture.reader();
        let root = XmlElement::new(
            "w:document",
            attrs(&[]),
            vec![element(
                "w:body",
                attrs(&[]),
                vec![element("w:p", attrs(&[]), vec![])],
            )],
        );
        let result = read_document(&mut reader, &root, Notes::default(), Vec::new()).unwrap();
        assert!(result.messages.is_empty());
        assert!(matches!(
            result.value.children.as_slice(),
            [DocumentElement::Paragraph(_)]
        ));
    }
}
