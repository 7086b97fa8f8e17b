//! Rendering the document model into the output tree and text.
//!
//! Rendering is a single pass over the model. Notes and comments referenced
//! along the way are accumulated and appended after the body; images are
//! deferred and resolved asynchronously once the pass is complete.

pub mod images;

use std::collections::HashMap;
use std::sync::Arc;

use crate::common::{dedup_messages, Message, WithMessages};
use crate::docx::{
    BreakKind, Comment, CommentReference, Document, DocumentElement, Hyperlink, HyperlinkTarget,
    Note, NoteReference, Paragraph, Run, Table, TableCell, TableRow, VerticalAlignment,
};
use crate::html::paths::{HtmlPath, HtmlPathElement};
use crate::html::simplify::simplify;
use crate::html::write::{write, OutputFormat};
use crate::html::{
    element_with_tag, fresh_element, non_fresh_element, text, DeferredId, HtmlNode,
};
use crate::stylemap::{MatchTarget, RunFlag, StyleMap, DEFAULT_STYLE_MAP};

use images::{ConvertImage, DataUriConverter};

/// Options controlling a conversion.
#[derive(Clone)]
pub struct ConversionOptions {
    style_map: StyleMap,
    id_prefix: String,
    ignore_empty_paragraphs: bool,
    output_format: OutputFormat,
    convert_image: Arc<dyn ConvertImage>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            style_map: DEFAULT_STYLE_MAP.clone(),
            id_prefix: String::new(),
            ignore_empty_paragraphs: true,
            output_format: OutputFormat::Html,
            convert_image: Arc::new(DataUriConverter),
        }
    }
}

impl ConversionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom style map; its mappings take precedence over the
    /// built-in defaults.
    pub fn style_map(mut self, style_map: StyleMap) -> Self {
        self.style_map = style_map.followed_by(&DEFAULT_STYLE_MAP);
        self
    }

    /// Prefix for every generated HTML id, to keep ids unique when several
    /// converted documents share a page.
    pub fn id_prefix(mut self, id_prefix: impl Into<String>) -> Self {
        self.id_prefix = id_prefix.into();
        self
    }

    /// Keep empty paragraphs instead of dropping them (the default).
    pub fn keep_empty_paragraphs(mut self) -> Self {
        self.ignore_empty_paragraphs = false;
        self
    }

    pub fn output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    pub fn convert_image(mut self, convert_image: Arc<dyn ConvertImage>) -> Self {
        self.convert_image = convert_image;
        self
    }
}

/// Converts documents to output text using a fixed set of options.
pub struct DocumentConverter {
    options: ConversionOptions,
}

impl DocumentConverter {
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }

    /// Convert a document to output text plus the messages produced along
    /// the way, deduplicated in order of first occurrence.
    pub async fn convert(&self, document: &Document) -> WithMessages<String> {
        let mut messages = Vec::new();
        let mut conversion = DocumentConversion::new(&self.options, &document.comments);
        let nodes = conversion.convert_document(document, &mut messages);

        // Deferred content resolves sequentially, in document order, so
        // messages and side effects stay deterministic.
        let mut resolved: HashMap<DeferredId, Vec<HtmlNode>> = HashMap::new();
        for (deferred_id, image) in std::mem::take(&mut conversion.deferred) {
            match self.options.convert_image.convert(&image).await {
                Ok(image_nodes) => {
                    resolved.insert(deferred_id, image_nodes);
                }
                Err(error) => {
                    messages.push(Message::error(error.to_string()));
                    resolved.insert(deferred_id, Vec::new());
                }
            }
        }

        let nodes = simplify(replace_deferred(nodes, &resolved));
        let output = write(self.options.output_format, &nodes);
        dedup_messages(&mut messages);
        WithMessages::with(output, messages)
    }
}

fn replace_deferred(
    nodes: Vec<HtmlNode>,
    resolved: &HashMap<DeferredId, Vec<HtmlNode>>,
) -> Vec<HtmlNode> {
    nodes
        .into_iter()
        .flat_map(|node| match node {
            HtmlNode::Deferred(deferred_id) => {
                resolved.get(&deferred_id).cloned().unwrap_or_default()
            }
            HtmlNode::Element(mut element) => {
                element.children = replace_deferred(element.children, resolved);
                vec![HtmlNode::Element(element)]
            }
            other => vec![other],
        })
        .collect()
}

/// The mutable state of one conversion pass.
struct DocumentConversion<'a> {
    options: &'a ConversionOptions,
    comments_by_id: HashMap<&'a str, &'a Comment>,
    note_number: u64,
    note_references: Vec<&'a NoteReference>,
    referenced_comments: Vec<(String, &'a Comment)>,
    deferred: Vec<(DeferredId, crate::docx::Image)>,
}

impl<'a> DocumentConversion<'a> {
    fn new(options: &'a ConversionOptions, comments: &'a [Comment]) -> Self {
        Self {
            options,
            comments_by_id: comments
                .iter()
                .map(|comment| (comment.comment_id.as_str(), comment))
                .collect(),
            note_number: 1,
            note_references: Vec::new(),
            referenced_comments: Vec::new(),
            deferred: Vec::new(),
        }
    }

    fn convert_document(
        &mut self,
        document: &'a Document,
        messages: &mut Vec<Message>,
    ) -> Vec<HtmlNode> {
        let mut nodes = self.convert_children(&document.children, messages, false);

        // Note bodies are converted after the body text; references inside
        // note bodies themselves are linked but not expanded further.
        let references = std::mem::take(&mut self.note_references);
        let mut note_nodes = Vec::new();
        for reference in references {
            match document.notes.resolve(reference) {
                Some(note) => note_nodes.extend(self.convert_note(note, messages)),
                None => messages.push(Message::warning(format!(
                    "Could not find {} with ID {}",
                    reference.note_kind.as_str(),
                    reference.note_id
                ))),
            }
        }
        nodes.push(fresh_element("ol", Default::default(), note_nodes));

        let referenced_comments = std::mem::take(&mut self.referenced_comments);
        let mut comment_nodes = Vec::new();
        for (label, comment) in referenced_comments {
            comment_nodes.extend(self.convert_comment(&label, comment, messages));
        }
        nodes.push(fresh_element("dl", Default::default(), comment_nodes));

        nodes
    }

    fn convert_children(
        &mut self,
        children: &'a [DocumentElement],
        messages: &mut Vec<Message>,
        is_table_header: bool,
    ) -> Vec<HtmlNode> {
        children
            .iter()
            .flat_map(|child| self.convert_element(child, messages, is_table_header))
            .collect()
    }

    fn convert_element(
        &mut self,
        element: &'a DocumentElement,
        messages: &mut Vec<Message>,
        is_table_header: bool,
    ) -> Vec<HtmlNode> {
        match element {
            DocumentElement::Document(document) => self.convert_document(document, messages),
            DocumentElement::Paragraph(paragraph) => {
                self.convert_paragraph(paragraph, messages, is_table_header)
            }
            DocumentElement::Run(run) => self.convert_run(run, messages, is_table_header),
            DocumentElement::Text(value) => vec![text(value.clone())],
            DocumentElement::Tab => vec![text("\t")],
            DocumentElement::Hyperlink(hyperlink) => {
                self.convert_hyperlink(hyperlink, messages, is_table_header)
            }
            DocumentElement::BookmarkStart(bookmark) => {
                vec![fresh_element(
                    "a",
                    crate::html::attributes(&[("id", &self.html_id(&bookmark.name))]),
                    vec![HtmlNode::ForceWrite],
                )]
            }
            DocumentElement::NoteReference(reference) => self.convert_note_reference(reference),
            DocumentElement::CommentReference(reference) => {
                self.convert_comment_reference(reference, messages)
            }
            DocumentElement::Table(table) => self.convert_table(table, messages),
            DocumentElement::TableRow(row) => self.convert_table_row(row, messages, is_table_header),
            DocumentElement::TableCell(cell) => {
                self.convert_table_cell(cell, messages, is_table_header)
            }
            DocumentElement::Image(image) => {
                let deferred_id = self.deferred.len();
                self.deferred.push((deferred_id, image.clone()));
                vec![HtmlNode::Deferred(deferred_id)]
            }
            DocumentElement::Break(kind) => self.convert_break(*kind),
        }
    }

    fn convert_paragraph(
        &mut self,
        paragraph: &'a Paragraph,
        messages: &mut Vec<Message>,
        is_table_header: bool,
    ) -> Vec<HtmlNode> {
        match self.path_for_paragraph(paragraph, messages) {
            HtmlPath::Ignore => Vec::new(),
            HtmlPath::Elements(elements) => {
                let mut content = if self.options.ignore_empty_paragraphs {
                    Vec::new()
                } else {
                    vec![HtmlNode::ForceWrite]
                };
                content.extend(self.convert_children(
                    &paragraph.children,
                    messages,
                    is_table_header,
                ));
                wrap_elements(&elements, content)
            }
        }
    }

    fn path_for_paragraph(
        &self,
        paragraph: &'a Paragraph,
        messages: &mut Vec<Message>,
    ) -> HtmlPath {
        let mut path = match self
            .options
            .style_map
            .find(&MatchTarget::Paragraph(paragraph))
        {
            Some(path) => path.clone(),
            None => {
                if let Some(style_id) = &paragraph.style.style_id {
                    messages.push(unrecognised_style_warning(
                        "paragraph",
                        style_id,
                        paragraph.style.style_name.as_deref(),
                    ));
                }
                HtmlPath::Elements(vec![HtmlPathElement::new("p").fresh()])
            }
        };
        if let Some(alignment) = &paragraph.alignment {
            // The alignment lands on the outermost element only, so list
            // wrappers are not styled per item.
            if let HtmlPath::Elements(elements) = &mut path {
                if let Some(first) = elements.first_mut() {
                    let align_style = format!("text-align:{alignment};");
                    let style = first.attributes.entry("style".to_string()).or_default();
                    *style = format!("{align_style}{style}");
                }
            }
        }
        path
    }

    fn convert_run(
        &mut self,
        run: &'a Run,
        messages: &mut Vec<Message>,
        is_table_header: bool,
    ) -> Vec<HtmlNode> {
        // Built innermost first; the style mapping ends up outermost.
        let mut paths: Vec<HtmlPath> = Vec::new();
        if run.is_small_caps {
            paths.push(self.run_property_path(RunFlag::SmallCaps, None));
        }
        if run.is_all_caps {
            paths.push(self.run_property_path(RunFlag::AllCaps, None));
        }
        if run.is_strikethrough {
            paths.push(self.run_property_path(RunFlag::Strikethrough, Some("s")));
        }
        if run.is_underline {
            paths.push(self.run_property_path(RunFlag::Underline, None));
        }
        match run.vertical_alignment {
            VerticalAlignment::Subscript => {
                paths.push(HtmlPath::Elements(vec![HtmlPathElement::new("sub")]));
            }
            VerticalAlignment::Superscript => {
                paths.push(HtmlPath::Elements(vec![HtmlPathElement::new("sup")]));
            }
            VerticalAlignment::Baseline => {}
        }
        if run.is_italic {
            paths.push(self.run_property_path(RunFlag::Italic, Some("em")));
        }
        if run.is_bold {
            paths.push(self.run_property_path(RunFlag::Bold, Some("strong")));
        }

        let mut inline_style = Vec::new();
        if let Some(color) = &run.color {
            inline_style.push(format!("color:#{color}"));
        }
        if let Some(highlight) = &run.highlight {
            inline_style.push(format!("background-color:{highlight}"));
        }
        if !inline_style.is_empty() {
            let mut span = HtmlPathElement::new("span");
            span.attributes
                .insert("style".to_string(), inline_style.join(";"));
            paths.push(HtmlPath::Elements(vec![span]));
        }

        let style_path = match self.options.style_map.find(&MatchTarget::Run(run)) {
            Some(path) => path.clone(),
            None => {
                if let Some(style_id) = &run.style.style_id {
                    messages.push(unrecognised_style_warning(
                        "run",
                        style_id,
                        run.style.style_name.as_deref(),
                    ));
                }
                HtmlPath::empty()
            }
        };
        paths.push(style_path);

        self.wrap_run_paths(&paths, run, messages, is_table_header)
    }

    /// Apply paths outermost first; an ignore path anywhere suppresses the
    /// content without converting it.
    fn wrap_run_paths(
        &mut self,
        paths: &[HtmlPath],
        run: &'a Run,
        messages: &mut Vec<Message>,
        is_table_header: bool,
    ) -> Vec<HtmlNode> {
        match paths.split_last() {
            None => self.convert_children(&run.children, messages, is_table_header),
            Some((outermost, inner)) => match outermost {
                HtmlPath::Ignore => Vec::new(),
                HtmlPath::Elements(elements) => {
                    let nodes = self.wrap_run_paths(inner, run, messages, is_table_header);
                    wrap_elements(elements, nodes)
                }
            },
        }
    }

    fn run_property_path(&self, flag: RunFlag, default_tag_name: Option<&str>) -> HtmlPath {
        match self.options.style_map.find(&MatchTarget::Flag(flag)) {
            Some(path) => path.clone(),
            None => match default_tag_name {
                Some(tag_name) => HtmlPath::Elements(vec![HtmlPathElement::new(tag_name)]),
                None => HtmlPath::empty(),
            },
        }
    }

    fn convert_hyperlink(
        &mut self,
        hyperlink: &'a Hyperlink,
        messages: &mut Vec<Message>,
        is_table_header: bool,
    ) -> Vec<HtmlNode> {
        let href = match &hyperlink.target {
            HyperlinkTarget::Href(href) => href.clone(),
            HyperlinkTarget::Anchor(anchor) => format!("#{}", self.html_id(anchor)),
        };
        let mut attributes = std::collections::BTreeMap::new();
        attributes.insert("href".to_string(), href);
        if let Some(target_frame) = &hyperlink.target_frame {
            attributes.insert("target".to_string(), target_frame.clone());
        }
        let children = self.convert_children(&hyperlink.children, messages, is_table_header);
        vec![non_fresh_element("a", attributes, children)]
    }

    fn convert_note_reference(&mut self, reference: &'a NoteReference) -> Vec<HtmlNode> {
        self.note_references.push(reference);
        let number = self.note_number;
        self.note_number += 1;
        let anchor = fresh_element(
            "a",
            crate::html::attributes(&[
                ("href", &format!("#{}", self.note_html_id(reference))),
                ("id", &self.note_ref_html_id(reference)),
            ]),
            vec![text(format!("[{number}]"))],
        );
        vec![fresh_element("sup", Default::default(), vec![anchor])]
    }

    fn convert_note(&mut self, note: &'a Note, messages: &mut Vec<Message>) -> Vec<HtmlNode> {
        let mut body = self.convert_children(&note.body, messages, false);
        let reference = NoteReference {
            note_kind: note.note_kind,
            note_id: note.note_id.clone(),
        };
        body.push(non_fresh_element(
            "p",
            Default::default(),
            vec![
                text(" "),
                fresh_element(
                    "a",
                    crate::html::attributes(&[(
                        "href",
                        &format!("#{}", self.note_ref_html_id(&reference)),
                    )]),
                    vec![text("↑")],
                ),
            ],
        ));
        vec![element_with_tag(
            crate::html::Tag {
                tag_names: vec!["li".to_string()],
                attributes: crate::html::attributes(&[("id", &self.note_html_id(&reference))]),
                fresh: true,
                separator: String::new(),
            },
            body,
        )]
    }

    fn convert_comment_reference(
        &mut self,
        reference: &'a CommentReference,
        messages: &mut Vec<Message>,
    ) -> Vec<HtmlNode> {
        // Comment references are dropped unless a mapping opts in.
        let path = match self
            .options
            .style_map
            .find(&MatchTarget::CommentReference)
        {
            Some(path) => path.clone(),
            None => HtmlPath::Ignore,
        };
        let HtmlPath::Elements(elements) = path else {
            return Vec::new();
        };
        let Some(comment) = self.comments_by_id.get(reference.comment_id.as_str()).copied()
        else {
            messages.push(Message::warning(format!(
                "Could not find comment with ID {}",
                reference.comment_id
            )));
            return Vec::new();
        };
        let count = self.referenced_comments.len() + 1;
        let label = format!(
            "[{}{}]",
            comment.author_initials.as_deref().unwrap_or(""),
            count
        );
        self.referenced_comments.push((label.clone(), comment));
        let anchor = fresh_element(
            "a",
            crate::html::attributes(&[
                (
                    "href",
                    &format!("#{}", self.referent_html_id("comment", &reference.comment_id)),
                ),
                (
                    "id",
                    &self.reference_html_id("comment", &reference.comment_id),
                ),
            ]),
            vec![text(label)],
        );
        wrap_elements(&elements, vec![anchor])
    }

    fn convert_comment(
        &mut self,
        label: &str,
        comment: &'a Comment,
        messages: &mut Vec<Message>,
    ) -> Vec<HtmlNode> {
        let mut body = self.convert_children(&comment.body, messages, false);
        body.push(non_fresh_element(
            "p",
            Default::default(),
            vec![
                text(" "),
                fresh_element(
                    "a",
                    crate::html::attributes(&[(
                        "href",
                        &format!("#{}", self.reference_html_id("comment", &comment.comment_id)),
                    )]),
                    vec![text("↑")],
                ),
            ],
        ));
        vec![
            element_with_tag(
                crate::html::Tag {
                    tag_names: vec!["dt".to_string()],
                    attributes: crate::html::attributes(&[(
                        "id",
                        &self.referent_html_id("comment", &comment.comment_id),
                    )]),
                    fresh: true,
                    separator: String::new(),
                },
                vec![text(format!("Comment {label}"))],
            ),
            fresh_element("dd", Default::default(), body),
        ]
    }

    fn convert_table(&mut self, table: &'a Table, messages: &mut Vec<Message>) -> Vec<HtmlNode> {
        let path = match self.options.style_map.find(&MatchTarget::Table(table)) {
            Some(path) => path.clone(),
            None => HtmlPath::Elements(vec![HtmlPathElement::new("table").fresh()]),
        };
        let HtmlPath::Elements(elements) = path else {
            return Vec::new();
        };
        let children = self.convert_table_children(table, messages);
        wrap_elements(&elements, children)
    }

    fn convert_table_children(
        &mut self,
        table: &'a Table,
        messages: &mut Vec<Message>,
    ) -> Vec<HtmlNode> {
        let body_index = table
            .children
            .iter()
            .position(|child| {
                !matches!(child, DocumentElement::TableRow(row) if row.is_header)
            })
            .unwrap_or(table.children.len());
        let mut children = vec![HtmlNode::ForceWrite];
        if body_index == 0 {
            children.extend(self.convert_children(&table.children, messages, false));
        } else {
            let head_rows = self.convert_children(&table.children[..body_index], messages, true);
            let body_rows = self.convert_children(&table.children[body_index..], messages, false);
            children.push(fresh_element("thead", Default::default(), head_rows));
            children.push(fresh_element("tbody", Default::default(), body_rows));
        }
        children
    }

    fn convert_table_row(
        &mut self,
        row: &'a TableRow,
        messages: &mut Vec<Message>,
        is_table_header: bool,
    ) -> Vec<HtmlNode> {
        let mut children = vec![HtmlNode::ForceWrite];
        children.extend(self.convert_children(&row.children, messages, is_table_header));
        vec![fresh_element("tr", Default::default(), children)]
    }

    fn convert_table_cell(
        &mut self,
        cell: &'a TableCell,
        messages: &mut Vec<Message>,
        is_table_header: bool,
    ) -> Vec<HtmlNode> {
        let tag_name = if is_table_header { "th" } else { "td" };
        let mut attributes = std::collections::BTreeMap::new();
        if cell.colspan != 1 {
            attributes.insert("colspan".to_string(), cell.colspan.to_string());
        }
        if cell.rowspan != 1 {
            attributes.insert("rowspan".to_string(), cell.rowspan.to_string());
        }
        let mut children = vec![HtmlNode::ForceWrite];
        children.extend(self.convert_children(&cell.children, messages, is_table_header));
        vec![fresh_element(tag_name, attributes, children)]
    }

    fn convert_break(&mut self, kind: BreakKind) -> Vec<HtmlNode> {
        let path = match self.options.style_map.find(&MatchTarget::Break(kind)) {
            Some(path) => path.clone(),
            None if kind == BreakKind::Line => {
                HtmlPath::Elements(vec![HtmlPathElement::new("br").fresh()])
            }
            None => HtmlPath::empty(),
        };
        path.wrap(Vec::new)
    }

    fn html_id(&self, suffix: &str) -> String {
        format!("{}{}", self.options.id_prefix, suffix)
    }

    fn referent_html_id(&self, reference_type: &str, reference_id: &str) -> String {
        self.html_id(&format!("{reference_type}-{reference_id}"))
    }

    fn reference_html_id(&self, reference_type: &str, reference_id: &str) -> String {
        self.html_id(&format!("{reference_type}-ref-{reference_id}"))
    }

    fn note_html_id(&self, reference: &NoteReference) -> String {
        self.referent_html_id(reference.note_kind.as_str(), &reference.note_id)
    }

    fn note_ref_html_id(&self, reference: &NoteReference) -> String {
        self.reference_html_id(reference.note_kind.as_str(), &reference.note_id)
    }
}

fn wrap_elements(elements: &[HtmlPathElement], nodes: Vec<HtmlNode>) -> Vec<HtmlNode> {
    let mut nodes = nodes;
    for element in elements.iter().rev() {
        nodes = vec![element_with_tag(element.tag(), nodes)];
    }
    nodes
}

fn unrecognised_style_warning(
    element_type: &str,
    style_id: &str,
    style_name: Option<&str>,
) -> Message {
    Message::warning(format!(
        "Unrecognised {} style: '{}' (Style ID: {})",
        element_type,
        style_name.unwrap_or(""),
        style_id
    ))
}
