//! The semantic document model produced by the readers.
//!
//! Every node kind the renderer can encounter is a variant of
//! [`DocumentElement`], so rendering dispatch is an exhaustive match rather
//! than a string-keyed table. Elements are built once by the readers and are
//! read-only afterwards.

use std::collections::HashMap;

use super::files::ImageSource;
use super::numbering::NumberingLevel;

/// A node in the document model.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentElement {
    Document(Document),
    Paragraph(Paragraph),
    Run(Run),
    Text(String),
    Tab,
    Hyperlink(Hyperlink),
    BookmarkStart(BookmarkStart),
    NoteReference(NoteReference),
    CommentReference(CommentReference),
    Table(Table),
    TableRow(TableRow),
    TableCell(TableCell),
    Image(Image),
    Break(BreakKind),
}

/// The complete document: body content plus the note and comment tables
/// that references resolve against.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub children: Vec<DocumentElement>,
    pub notes: Notes,
    pub comments: Vec<Comment>,
}

/// Style attachment shared by paragraphs, runs and tables: the raw style ID
/// plus the human-readable name resolved from the styles table (if found).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleRef {
    pub style_id: Option<String>,
    pub style_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub children: Vec<DocumentElement>,
    pub style: StyleRef,
    pub alignment: Option<String>,
    pub numbering: Option<NumberingLevel>,
    pub indent: ParagraphIndent,
}

/// Paragraph indentation, carried as the raw attribute strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParagraphIndent {
    pub start: Option<String>,
    pub end: Option<String>,
    pub first_line: Option<String>,
    pub hanging: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Run {
    pub children: Vec<DocumentElement>,
    pub style: StyleRef,
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_underline: bool,
    pub is_strikethrough: bool,
    pub is_all_caps: bool,
    pub is_small_caps: bool,
    pub vertical_alignment: VerticalAlignment,
    pub color: Option<String>,
    pub highlight: Option<String>,
    pub font: Option<String>,
    /// Font size in points (`w:sz` stores half-points).
    pub font_size: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    #[default]
    Baseline,
    Superscript,
    Subscript,
}

impl VerticalAlignment {
    /// Map a `w:vertAlign` value; anything unrecognised is baseline.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("superscript") => VerticalAlignment::Superscript,
            Some("subscript") => VerticalAlignment::Subscript,
            _ => VerticalAlignment::Baseline,
        }
    }
}

/// A hyperlink around inline content, either to an external target or to a
/// bookmark anchor within the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Hyperlink {
    pub children: Vec<DocumentElement>,
    pub target: HyperlinkTarget,
    pub target_frame: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HyperlinkTarget {
    Href(String),
    Anchor(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkStart {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    Footnote,
    Endnote,
}

impl NoteKind {
    /// The name used in generated HTML ids (`footnote-3`, `endnote-ref-2`).
    pub fn as_str(self) -> &'static str {
        match self {
            NoteKind::Footnote => "footnote",
            NoteKind::Endnote => "endnote",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteReference {
    pub note_kind: NoteKind,
    pub note_id: String,
}

/// A footnote or endnote body, resolved through the document's note table.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub note_kind: NoteKind,
    pub note_id: String,
    pub body: Vec<DocumentElement>,
}

/// The document's notes, indexed by kind and id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Notes {
    notes: HashMap<(NoteKind, String), Note>,
}

impl Notes {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            notes: notes
                .into_iter()
                .map(|note| ((note.note_kind, note.note_id.clone()), note))
                .collect(),
        }
    }

    /// Look up the note a reference points at.
    pub fn resolve(&self, reference: &NoteReference) -> Option<&Note> {
        self.notes
            .get(&(reference.note_kind, reference.note_id.clone()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentReference {
    pub comment_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub comment_id: String,
    pub body: Vec<DocumentElement>,
    pub author_name: Option<String>,
    pub author_initials: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub children: Vec<DocumentElement>,
    pub style: StyleRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub children: Vec<DocumentElement>,
    pub is_header: bool,
}

/// A table cell with its final merged geometry.
///
/// `colspan`/`rowspan` are always at least 1 once the merge pass has run.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub children: Vec<DocumentElement>,
    pub colspan: usize,
    pub rowspan: usize,
    /// Merge bookkeeping used only between cell reading and the merge pass:
    /// true when this cell continues the vertical merge of the cell above.
    pub(crate) vmerge: bool,
}

impl TableCell {
    pub fn new(children: Vec<DocumentElement>, colspan: usize) -> Self {
        Self {
            children,
            colspan,
            rowspan: 1,
            vmerge: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub source: ImageSource,
    pub content_type: Option<String>,
    pub alt_text: Option<String>,
}

impl Image {
    /// Fetch the image bytes through the captured lazy reader.
    pub fn read(&self) -> crate::common::Result<Vec<u8>> {
        self.source.read()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    Line,
    Page,
    Column,
}
