//! Reading of the footnote and endnote parts.

use crate::common::WithMessages;
use crate::xml::XmlElement;

use super::body::BodyReader;
use super::document::{Note, NoteKind};

/// Read the notes of one part (`w:footnotes` or `w:endnotes`).
///
/// Word stores the separator rules as notes too; those carry a `w:type` and
/// are not content.
pub fn read_notes(
    reader: &mut BodyReader<'_>,
    root: &XmlElement,
    note_kind: NoteKind,
) -> WithMessages<Vec<Note>> {
    let element_name = match note_kind {
        NoteKind::Footnote => "w:footnote",
        NoteKind::Endnote => "w:endnote",
    };
    let mut notes = Vec::new();
    let mut messages = Vec::new();
    for element in root.elements_named(element_name) {
        if matches!(
            element.attr("w:type"),
            Some("separator") | Some("continuationSeparator")
        ) {
            continue;
        }
        let Some(note_id) = element.attr("w:id") else {
            continue;
        };
        let result = reader.read_elements(&element.children);
        let mut body = result.elements;
        body.extend(result.extra);
        messages.extend(result.messages);
        notes.push(Note {
            note_kind,
            note_id: note_id.to_string(),
            body,
        });
    }
    WithMessages::with(notes, messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::document::DocumentElement;
    use crate::docx::test_support::{attrs, reader_fixture};
    use crate::xml::{element, text, XmlElement};

    #[test]
    fn test_separator_notes_are_skipped() {
        let fixture = reader_fixture();
        let mut reader = fixture.reader();
        let root = XmlElement::new(
            "w:footnotes",
            attrs(&[]),
            vec![
                element(
                    "w:footnote",
                    attrs(&[("w:type", "separator"), ("w:id", "0")]),
                    vec![],
                ),
                element(
                    "w:footnote",
                    attrs(&[("w:type", "continuationSeparator"), ("w:id", "1")]),
                    vec![],
                ),
                element(
                    "w:footnote",
                    attrs(&[("w:id", "2")]),
                    vec![element(
                        "w:p",
                        attrs(&[]),
                        vec![element(
                            "w:r",
                            attrs(&[]),
                            vec![element("w:t", attrs(&[]), vec![text("A note.")])],
                        )],
                    )],
                ),
            ],
        );
        let result = read_notes(&mut reader, &root, NoteKind::Footnote);
        assert!(result.messages.is_empty());
        assert_eq!(result.value.len(), 1);
        assert_eq!(result.value[0].note_id, "2");
        assert!(matches!(
            result.value[0].body.as_slice(),
            [DocumentElement::Paragraph(_)]
        ));
    }
}
