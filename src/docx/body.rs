//! The body reader: raw element tree → document model.
//!
//! Reading is total: unknown elements produce a warning and are skipped,
//! malformed ones degrade to whatever could be understood, and all problems
//! travel as [`Message`]s on the nearest [`ReadResult`]. Nothing aborts the
//! document.

use std::sync::Arc;

use phf::phf_set;
use smallvec::SmallVec;

use crate::common::{Message, WithMessages};
use crate::xml::{XmlElement, XmlNode};

use super::content_types::ContentTypes;
use super::document::{
    BookmarkStart, BreakKind, CommentReference, DocumentElement, Hyperlink, HyperlinkTarget, Image,
    NoteKind, NoteReference, Paragraph, ParagraphIndent, Run, StyleRef, Table, TableCell, TableRow,
    VerticalAlignment,
};
use super::files::{ImageSource, ReadFile};
use super::numbering::{Numbering, NumberingLevel};
use super::relationships::Relationships;
use super::styles::Styles;
use super::table;
use super::uris;

/// Elements that are deliberately skipped without a diagnostic.
///
/// `w:pPr`/`w:rPr` and the table property elements are consumed by their
/// parent readers; the rest carry no content this conversion preserves.
static IGNORED_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "office-word:wrap",
    "v:shadow",
    "v:shapetype",
    "w:annotationRef",
    "w:bookmarkEnd",
    "w:sectPr",
    "w:proofErr",
    "w:lastRenderedPageBreak",
    "w:commentRangeStart",
    "w:commentRangeEnd",
    "w:del",
    "w:footnoteRef",
    "w:endnoteRef",
    "w:pPr",
    "w:rPr",
    "w:tblPr",
    "w:tblGrid",
    "w:trPr",
    "w:tcPr",
};

/// Content types browsers can be expected to display inline.
static SUPPORTED_IMAGE_TYPES: phf::Set<&'static str> = phf_set! {
    "image/png",
    "image/gif",
    "image/jpeg",
    "image/svg+xml",
    "image/tiff",
};

/// The lookup services and byte readers one part's body reader consumes.
#[derive(Clone)]
pub struct ReaderContext<'a> {
    pub relationships: &'a Relationships,
    pub content_types: &'a ContentTypes,
    pub styles: &'a Styles,
    pub numbering: &'a Numbering,
    /// Byte access to entries inside the document archive.
    pub docx_file: Arc<dyn ReadFile>,
    /// Byte access to files referenced outside the archive (linked images).
    pub files: Arc<dyn ReadFile>,
}

/// The outcome of reading one element or a list of siblings.
#[derive(Debug, Default, PartialEq)]
pub struct ReadResult {
    pub elements: Vec<DocumentElement>,
    /// Content hoisted out of its container, to be re-inserted after the
    /// enclosing paragraph (`w:pict` content).
    pub extra: Vec<DocumentElement>,
    pub messages: Vec<Message>,
}

impl ReadResult {
    fn empty() -> Self {
        Self::default()
    }

    fn of(element: DocumentElement) -> Self {
        Self {
            elements: vec![element],
            ..Self::default()
        }
    }

    fn of_with_messages(element: DocumentElement, messages: Vec<Message>) -> Self {
        Self {
            elements: vec![element],
            extra: Vec::new(),
            messages,
        }
    }

    fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    fn combine(results: impl IntoIterator<Item = ReadResult>) -> Self {
        let mut combined = Self::empty();
        for mut result in results {
            combined.elements.append(&mut result.elements);
            combined.extra.append(&mut result.extra);
            combined.messages.append(&mut result.messages);
        }
        combined
    }

    /// Move all produced elements into the extra slot.
    fn into_extra(mut self) -> Self {
        self.extra.append(&mut std::mem::take(&mut self.elements));
        self
    }
}

/// Reads body content for one document part.
///
/// Holds the per-part mutable state: the complex-field stack and the field
/// instruction buffer. One reader never outlives the part it was made for,
/// so two conversions cannot interfere.
pub struct BodyReader<'a> {
    context: ReaderContext<'a>,
    // Fields nest rarely; spilling to the heap is the exception.
    complex_field_stack: SmallVec<[ComplexField; 4]>,
    current_instr_text: String,
}

#[derive(Debug, Clone, PartialEq)]
enum ComplexField {
    Unknown,
    Hyperlink(String),
}

impl<'a> BodyReader<'a> {
    pub fn new(context: ReaderContext<'a>) -> Self {
        Self {
            context,
            complex_field_stack: SmallVec::new(),
            current_instr_text: String::new(),
        }
    }

    /// Read a list of sibling nodes, concatenating results in order.
    pub fn read_elements(&mut self, nodes: &[XmlNode]) -> ReadResult {
        let results: Vec<ReadResult> = nodes
            .iter()
            .map(|node| match node {
                XmlNode::Element(element) => self.read_element(element),
                XmlNode::Text(_) => ReadResult::empty(),
            })
            .collect();
        ReadResult::combine(results)
    }

    /// Read a single raw element.
    pub fn read_element(&mut self, element: &XmlElement) -> ReadResult {
        match element.name.as_str() {
            "w:p" => self.read_paragraph(element),
            "w:r" => self.read_run(element),
            "w:t" => ReadResult::of(DocumentElement::Text(element.text())),
            "w:tab" => ReadResult::of(DocumentElement::Tab),
            "w:noBreakHyphen" => ReadResult::of(DocumentElement::Text("\u{2011}".to_string())),
            "w:softHyphen" => ReadResult::of(DocumentElement::Text("\u{00AD}".to_string())),
            "w:sym" => ReadResult::with_messages(vec![Message::warning(format!(
                "A w:sym element with an unsupported character was ignored: char {} in font {}",
                element.attr("w:char").unwrap_or("(none)"),
                element.attr("w:font").unwrap_or("(none)"),
            ))]),
            "w:hyperlink" => self.read_hyperlink(element),
            "w:fldChar" => self.read_fld_char(element),
            "w:instrText" => {
                self.current_instr_text.push_str(&element.text());
                ReadResult::empty()
            }
            "w:br" => read_break(element),
            "w:bookmarkStart" => read_bookmark_start(element),
            "w:tbl" => self.read_table(element),
            "w:tr" => self.read_table_row(element),
            "w:tc" => self.read_table_cell(element),
            "w:footnoteReference" => read_note_reference(NoteKind::Footnote, element),
            "w:endnoteReference" => read_note_reference(NoteKind::Endnote, element),
            "w:commentReference" => read_comment_reference(element),
            "mc:AlternateContent" => match element.first("mc:Fallback") {
                Some(fallback) => self.read_elements(&fallback.children),
                None => ReadResult::empty(),
            },
            "w:sdt" => self.read_elements(&element.first_or_empty("w:sdtContent").children),
            "w:ins" | "w:object" | "w:smartTag" | "w:drawing" | "v:group" | "v:rect"
            | "v:roundrect" | "v:shape" | "v:textbox" | "w:txbxContent" => {
                self.read_elements(&element.children)
            }
            "w:pict" => self.read_elements(&element.children).into_extra(),
            "wp:inline" | "wp:anchor" => self.read_drawing_element(element),
            "v:imagedata" => self.read_image_data(element),
            name if IGNORED_ELEMENTS.contains(name) => ReadResult::empty(),
            name => ReadResult::with_messages(vec![Message::warning(format!(
                "An unrecognised element was ignored: {name}"
            ))]),
        }
    }

    fn read_paragraph(&mut self, element: &XmlElement) -> ReadResult {
        let properties = self.read_paragraph_properties(element.first_or_empty("w:pPr"));
        let children = self.read_elements(&element.children);

        let mut messages = properties.messages;
        let (style, alignment, numbering, indent) = properties.value;
        let ReadResult {
            elements,
            extra,
            messages: child_messages,
        } = children;
        messages.extend(child_messages);

        let paragraph = DocumentElement::Paragraph(Paragraph {
            children: elements,
            style,
            alignment,
            numbering,
            indent,
        });
        // Hoisted picture content lands immediately after its paragraph.
        let mut out = vec![paragraph];
        out.extend(extra);
        ReadResult {
            elements: out,
            extra: Vec::new(),
            messages,
        }
    }

    #[allow(clippy::type_complexity)]
    fn read_paragraph_properties(
        &self,
        properties: &XmlElement,
    ) -> WithMessages<(
        StyleRef,
        Option<String>,
        Option<NumberingLevel>,
        ParagraphIndent,
    )> {
        let style = self.read_style(properties, "w:pStyle", StyleCategory::Paragraph);
        let alignment = properties
            .first_or_empty("w:jc")
            .attr("w:val")
            .map(str::to_string);
        let numbering = self.read_numbering_properties(
            style.value.style_id.as_deref(),
            properties.first_or_empty("w:numPr"),
        );
        let indent = read_paragraph_indent(properties.first_or_empty("w:ind"));
        style.map(|style| (style, alignment, numbering, indent))
    }

    /// Style-linked numbering wins over the paragraph's own `numPr`.
    fn read_numbering_properties(
        &self,
        style_id: Option<&str>,
        num_pr: &XmlElement,
    ) -> Option<NumberingLevel> {
        if let Some(style_id) = style_id {
            if let Some(level) = self
                .context
                .numbering
                .find_level_by_paragraph_style_id(style_id)
            {
                return Some(level);
            }
        }
        let level_index: u64 = num_pr
            .first_or_empty("w:ilvl")
            .attr("w:val")?
            .parse()
            .ok()?;
        let num_id = num_pr.first_or_empty("w:numId").attr("w:val")?;
        self.context.numbering.find_level(num_id, level_index)
    }

    fn read_run(&mut self, element: &XmlElement) -> ReadResult {
        let properties = self.read_run_properties(element.first_or_empty("w:rPr"));
        let children = self.read_elements(&element.children);

        let mut messages = properties.messages;
        let run = properties.value;
        let ReadResult {
            mut elements,
            extra,
            messages: child_messages,
        } = children;
        messages.extend(child_messages);

        // Children are read before the wrap check, so the run holding the
        // separate marker is wrapped but the run holding the end marker has
        // already closed the field.
        if let Some(href) = self.current_hyperlink_href() {
            elements = vec![DocumentElement::Hyperlink(Hyperlink {
                children: elements,
                target: HyperlinkTarget::Href(href),
                target_frame: None,
            })];
        }

        ReadResult {
            elements: vec![DocumentElement::Run(Run {
                children: elements,
                ..run
            })],
            extra,
            messages,
        }
    }

    fn read_run_properties(&self, properties: &XmlElement) -> WithMessages<Run> {
        let style = self.read_style(properties, "w:rStyle", StyleCategory::Run);
        // w:sz gives the font size in half points.
        let font_size = properties
            .first_or_empty("w:sz")
            .attr("w:val")
            .filter(|value| !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|value| value.parse::<f64>().ok())
            .map(|half_points| half_points / 2.0);
        style.map(|style| Run {
            children: Vec::new(),
            style,
            is_bold: read_boolean_element(properties.first("w:b")),
            is_italic: read_boolean_element(properties.first("w:i")),
            is_underline: read_underline_element(properties.first("w:u")),
            is_strikethrough: read_boolean_element(properties.first("w:strike")),
            is_all_caps: read_boolean_element(properties.first("w:caps")),
            is_small_caps: read_boolean_element(properties.first("w:smallCaps")),
            vertical_alignment: VerticalAlignment::from_value(
                properties.first_or_empty("w:vertAlign").attr("w:val"),
            ),
            color: properties
                .first_or_empty("w:color")
                .attr("w:val")
                .map(str::to_string),
            highlight: properties
                .first_or_empty("w:highlight")
                .attr("w:val")
                .map(str::to_string),
            font: properties
                .first_or_empty("w:rFonts")
                .attr("w:ascii")
                .map(str::to_string),
            font_size,
        })
    }

    fn read_style(
        &self,
        element: &XmlElement,
        style_tag: &str,
        category: StyleCategory,
    ) -> WithMessages<StyleRef> {
        let mut style = StyleRef::default();
        let mut messages = Vec::new();
        if let Some(style_element) = element.first(style_tag) {
            if let Some(style_id) = style_element.attr("w:val") {
                style.style_id = Some(style_id.to_string());
                match category.find(self.context.styles, style_id) {
                    Some(definition) => style.style_name = definition.name.clone(),
                    None => messages.push(Message::warning(format!(
                        "{} style with ID {} was referenced but not defined in the document",
                        category.as_str(),
                        style_id
                    ))),
                }
            }
        }
        WithMessages::with(style, messages)
    }

    fn read_hyperlink(&mut self, element: &XmlElement) -> ReadResult {
        let relationship_id = element.attr("r:id");
        let anchor = element.attr("w:anchor");
        let target_frame = element
            .attr("w:tgtFrame")
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let ReadResult {
            elements,
            extra,
            mut messages,
        } = self.read_elements(&element.children);

        let wrapped = if let Some(relationship_id) = relationship_id {
            match self
                .context
                .relationships
                .find_target_by_relationship_id(relationship_id)
            {
                Some(target) => {
                    let href = match anchor {
                        Some(anchor) => uris::replace_fragment(target, anchor),
                        None => target.to_string(),
                    };
                    vec![DocumentElement::Hyperlink(Hyperlink {
                        children: elements,
                        target: HyperlinkTarget::Href(href),
                        target_frame,
                    })]
                }
                None => {
                    messages.push(Message::warning(format!(
                        "Hyperlink relationship with ID {relationship_id} was not found"
                    )));
                    elements
                }
            }
        } else if let Some(anchor) = anchor {
            vec![DocumentElement::Hyperlink(Hyperlink {
                children: elements,
                target: HyperlinkTarget::Anchor(anchor.to_string()),
                target_frame,
            })]
        } else {
            elements
        };

        ReadResult {
            elements: wrapped,
            extra,
            messages,
        }
    }

    fn read_fld_char(&mut self, element: &XmlElement) -> ReadResult {
        match element.attr("w:fldCharType") {
            Some("begin") => {
                self.complex_field_stack.push(ComplexField::Unknown);
                self.current_instr_text.clear();
            }
            Some("end") => {
                self.complex_field_stack.pop();
            }
            Some("separate") => {
                let field = match parse_hyperlink_field_code(&self.current_instr_text) {
                    Some(href) => ComplexField::Hyperlink(href),
                    None => ComplexField::Unknown,
                };
                self.complex_field_stack.pop();
                self.complex_field_stack.push(field);
            }
            _ => {}
        }
        ReadResult::empty()
    }

    fn current_hyperlink_href(&self) -> Option<String> {
        self.complex_field_stack
            .iter()
            .rev()
            .find_map(|field| match field {
                ComplexField::Hyperlink(href) => Some(href.clone()),
                ComplexField::Unknown => None,
            })
    }

    fn read_table(&mut self, element: &XmlElement) -> ReadResult {
        let style = self.read_style(
            element.first_or_empty("w:tblPr"),
            "w:tblStyle",
            StyleCategory::Table,
        );
        let ReadResult {
            elements,
            extra,
            mut messages,
        } = self.read_elements(&element.children);

        let merged = table::calculate_row_spans(elements);
        messages.extend(merged.messages);
        messages.extend(style.messages);

        ReadResult {
            elements: vec![DocumentElement::Table(Table {
                children: merged.value,
                style: style.value,
            })],
            extra,
            messages,
        }
    }

    fn read_table_row(&mut self, element: &XmlElement) -> ReadResult {
        let is_header = element
            .first_or_empty("w:trPr")
            .first("w:tblHeader")
            .is_some();
        let ReadResult {
            elements,
            extra,
            messages,
        } = self.read_elements(&element.children);
        ReadResult {
            elements: vec![DocumentElement::TableRow(TableRow {
                children: elements,
                is_header,
            })],
            extra,
            messages,
        }
    }

    fn read_table_cell(&mut self, element: &XmlElement) -> ReadResult {
        let properties = element.first_or_empty("w:tcPr");
        let colspan = properties
            .first_or_empty("w:gridSpan")
            .attr("w:val")
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        let vmerge = match properties.first("w:vMerge") {
            Some(vmerge) => matches!(vmerge.attr("w:val"), Some("continue") | None),
            None => false,
        };
        let ReadResult {
            elements,
            extra,
            messages,
        } = self.read_elements(&element.children);
        let mut cell = TableCell::new(elements, colspan);
        cell.vmerge = vmerge;
        ReadResult {
            elements: vec![DocumentElement::TableCell(cell)],
            extra,
            messages,
        }
    }

    fn read_drawing_element(&mut self, element: &XmlElement) -> ReadResult {
        let alt_text = element.first("wp:docPr").and_then(read_alt_text);
        let mut results = Vec::new();
        for graphic in element.elements_named("a:graphic") {
            for graphic_data in graphic.elements_named("a:graphicData") {
                for pic in graphic_data.elements_named("pic:pic") {
                    for blip_fill in pic.elements_named("pic:blipFill") {
                        for blip in blip_fill.elements_named("a:blip") {
                            results.push(self.read_blip(blip, alt_text.clone()));
                        }
                    }
                }
            }
        }
        ReadResult::combine(results)
    }

    fn read_blip(&mut self, blip: &XmlElement, alt_text: Option<String>) -> ReadResult {
        if let Some(embed_id) = blip.attr("r:embed") {
            self.read_embedded_image(embed_id, alt_text)
        } else if let Some(link_id) = blip.attr("r:link") {
            match self
                .context
                .relationships
                .find_target_by_relationship_id(link_id)
            {
                Some(path) => self.read_image(
                    ImageSource::new(path, self.context.files.clone()),
                    alt_text,
                ),
                None => ReadResult::with_messages(vec![Message::warning(format!(
                    "Image relationship with ID {link_id} was not found"
                ))]),
            }
        } else {
            ReadResult::with_messages(vec![Message::warning(
                "An a:blip element without a relationship ID was ignored".to_string(),
            )])
        }
    }

    fn read_embedded_image(&mut self, relationship_id: &str, alt_text: Option<String>) -> ReadResult {
        match self
            .context
            .relationships
            .find_target_by_relationship_id(relationship_id)
        {
            Some(target) => {
                let path = uris::uri_to_zip_entry_name("word", target);
                self.read_image(
                    ImageSource::new(path, self.context.docx_file.clone()),
                    alt_text,
                )
            }
            None => ReadResult::with_messages(vec![Message::warning(format!(
                "Image relationship with ID {relationship_id} was not found"
            ))]),
        }
    }

    fn read_image(&mut self, source: ImageSource, alt_text: Option<String>) -> ReadResult {
        let content_type = self
            .context
            .content_types
            .find_content_type(source.path())
            .map(str::to_string);
        let messages = match content_type.as_deref() {
            Some(content_type) if SUPPORTED_IMAGE_TYPES.contains(content_type) => Vec::new(),
            _ => vec![Message::warning(format!(
                "Image of type {} is unlikely to display in web browsers",
                content_type.as_deref().unwrap_or("(unknown)")
            ))],
        };
        ReadResult::of_with_messages(
            DocumentElement::Image(Image {
                source,
                content_type,
                alt_text,
            }),
            messages,
        )
    }

    fn read_image_data(&mut self, element: &XmlElement) -> ReadResult {
        match element.attr("r:id") {
            Some(relationship_id) => self.read_embedded_image(
                relationship_id,
                element
                    .attr("o:title")
                    .filter(|value| !value.trim().is_empty())
                    .map(str::to_string),
            ),
            None => ReadResult::with_messages(vec![Message::warning(
                "A v:imagedata element without a relationship ID was ignored".to_string(),
            )]),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StyleCategory {
    Paragraph,
    Run,
    Table,
}

impl StyleCategory {
    fn as_str(self) -> &'static str {
        match self {
            StyleCategory::Paragraph => "Paragraph",
            StyleCategory::Run => "Run",
            StyleCategory::Table => "Table",
        }
    }

    fn find<'s>(self, styles: &'s Styles, style_id: &str) -> Option<&'s super::styles::Style> {
        match self {
            StyleCategory::Paragraph => styles.find_paragraph_style_by_id(style_id),
            StyleCategory::Run => styles.find_character_style_by_id(style_id),
            StyleCategory::Table => styles.find_table_style_by_id(style_id),
        }
    }
}

fn read_break(element: &XmlElement) -> ReadResult {
    match element.attr("w:type") {
        None | Some("textWrapping") => ReadResult::of(DocumentElement::Break(BreakKind::Line)),
        Some("page") => ReadResult::of(DocumentElement::Break(BreakKind::Page)),
        Some("column") => ReadResult::of(DocumentElement::Break(BreakKind::Column)),
        Some(break_type) => ReadResult::with_messages(vec![Message::warning(format!(
            "Unsupported break type: {break_type}"
        ))]),
    }
}

fn read_bookmark_start(element: &XmlElement) -> ReadResult {
    match element.attr("w:name") {
        // Word's own "last edit position" bookmark carries no meaning.
        Some("_GoBack") | None => ReadResult::empty(),
        Some(name) => ReadResult::of(DocumentElement::BookmarkStart(BookmarkStart {
            name: name.to_string(),
        })),
    }
}

fn read_note_reference(note_kind: NoteKind, element: &XmlElement) -> ReadResult {
    match element.attr("w:id") {
        Some(note_id) => ReadResult::of(DocumentElement::NoteReference(NoteReference {
            note_kind,
            note_id: note_id.to_string(),
        })),
        None => ReadResult::empty(),
    }
}

fn read_comment_reference(element: &XmlElement) -> ReadResult {
    match element.attr("w:id") {
        Some(comment_id) => ReadResult::of(DocumentElement::CommentReference(CommentReference {
            comment_id: comment_id.to_string(),
        })),
        None => ReadResult::empty(),
    }
}

fn read_alt_text(properties: &XmlElement) -> Option<String> {
    properties
        .attr("descr")
        .filter(|value| !value.trim().is_empty())
        .or_else(|| properties.attr("title").filter(|value| !value.trim().is_empty()))
        .map(str::to_string)
}

fn read_paragraph_indent(element: &XmlElement) -> ParagraphIndent {
    ParagraphIndent {
        // w:start/w:end are the post-transitional names; fall back to the
        // older left/right attributes.
        start: element
            .attr("w:start")
            .or_else(|| element.attr("w:left"))
            .map(str::to_string),
        end: element
            .attr("w:end")
            .or_else(|| element.attr("w:right"))
            .map(str::to_string),
        first_line: element.attr("w:firstLine").map(str::to_string),
        hanging: element.attr("w:hanging").map(str::to_string),
    }
}

fn read_boolean_element(element: Option<&XmlElement>) -> bool {
    match element {
        Some(element) => !matches!(element.attr("w:val"), Some("false") | Some("0")),
        None => false,
    }
}

fn read_underline_element(element: Option<&XmlElement>) -> bool {
    match element {
        Some(element) => !matches!(element.attr("w:val"), Some("false") | Some("0") | Some("none")),
        None => false,
    }
}

/// Extract the target of a `HYPERLINK "…"` field instruction.
///
/// Greedy: everything between the first quote after the keyword and the last
/// quote in the buffer, so switch arguments end up inside the target.
fn parse_hyperlink_field_code(code: &str) -> Option<String> {
    let index = code.find("HYPERLINK \"")?;
    let rest = &code[index + "HYPERLINK \"".len()..];
    let end = rest.rfind('"')?;
    Some(rest[..end].to_string())
}
