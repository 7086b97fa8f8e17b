//! Reading of the comments part.

use crate::common::{Message, WithMessages};
use crate::xml::XmlElement;

use super::body::BodyReader;
use super::document::Comment;

/// Read all comments from a `w:comments` root.
pub fn read_comments(reader: &mut BodyReader<'_>, root: &XmlElement) -> WithMessages<Vec<Comment>> {
    let mut comments = Vec::new();
    let mut messages = Vec::new();
    for element in root.elements_named("w:comment") {
        let Some(comment_id) = element.attr("w:id") else {
            messages.push(Message::warning("A comment without an ID was ignored"));
            continue;
        };
        let result = reader.read_elements(&element.children);
        let mut body = result.elements;
        body.extend(result.extra);
        messages.extend(result.messages);
        comments.push(Comment {
            comment_id: comment_id.to_string(),
            body,
            author_name: non_blank_attr(element, "w:author"),
            author_initials: non_blank_attr(element, "w:initials"),
        });
    }
    WithMessages::with(comments, messages)
}

fn non_blank_attr(element: &XmlElement, name: &str) -> Option<String> {
    element
        .attr(name)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::test_support::{attrs, reader_fixture};
    use crate::xml::{element, text, XmlElement};

    #[test]
    fn test_comment_authors_are_read_and_blank_values_dropped() {
        let fixture = reader_fixture();
        let mut reader = fixture.reader();
        let root = XmlElement::new(
            "w:comments",
            attrs(&[]),
            vec![element(
                "w:comment",
                attrs(&[("w:id", "1"), ("w:author", " The Piemaker "), ("w:initials", "")]),
                vec![element(
                    "w:p",
                    attrs(&[]),
                    vec![element(
                        "w:r",
                        attrs(&[]),
                        vec![element("w:t", attrs(&[]), vec![text("Delicious.")])],
                    )],
                )],
            )],
        );
        let result = read_comments(&mut reader, &root);
        assert!(result.messages.is_empty());
        assert_eq!(result.value.len(), 1);
        let comment = &result.value[0];
        assert_eq!(comment.comment_id, "1");
        assert_eq!(comment.author_name.as_deref(), Some(" The Piemaker "));
        assert_eq!(comment.author_initials, None);
        assert_eq!(comment.body.len(), 1);
    }
}
