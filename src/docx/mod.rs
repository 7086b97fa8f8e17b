//! Reading WordprocessingML element trees into the document model.
//!
//! The entry points are [`BodyReader`] for body content and the part readers
//! in [`document_reader`], [`notes`] and [`comments`]. The lookup tables
//! ([`Styles`], [`Relationships`], [`Numbering`], [`ContentTypes`]) are
//! populated by the caller; this module only queries them.

pub mod body;
pub mod comments;
pub mod content_types;
pub mod document;
pub mod document_reader;
pub mod files;
pub mod notes;
pub mod numbering;
pub mod relationships;
pub mod styles;
mod table;
mod uris;

pub use body::{BodyReader, ReadResult, ReaderContext};
pub use content_types::ContentTypes;
pub use document::{
    BookmarkStart, BreakKind, Comment, CommentReference, Document, DocumentElement, Hyperlink,
    HyperlinkTarget, Image, Note, NoteKind, NoteReference, Notes, Paragraph, ParagraphIndent, Run,
    StyleRef, Table, TableCell, TableRow, VerticalAlignment,
};
pub use files::{ImageSource, InMemoryFiles, ReadFile};
pub use numbering::{AbstractNum, AbstractNumLevel, Numbering, NumberingLevel};
pub use relationships::{Relationship, Relationships};
pub use styles::{NumberingStyle, Style, Styles};
