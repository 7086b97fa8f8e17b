//! Quince - Convert Word documents (.docx) into clean HTML or Markdown
//!
//! Conversion is driven by declarative style mappings: each Word style is
//! mapped to the HTML it should produce, and everything the map does not
//! recognise degrades gracefully with a warning instead of failing the
//! conversion.
//!
//! # Features
//!
//! - **Semantic output**: Word styles map to `h1`, `blockquote`, `strong` and
//!   friends rather than inline formatting
//! - **Custom style maps**: A small mapping language
//!   (`p[style-name='Quote'] => blockquote:fresh`) overrides the defaults
//! - **Lists, tables, notes**: Numbering becomes nested `ul`/`ol`, merged
//!   cells become `colspan`/`rowspan`, footnotes and endnotes are numbered
//!   and linked
//! - **Self-contained images**: Images are inlined as base64 `data:` URIs by
//!   default, with an async hook for custom converters
//!
//! # Example - Converting a document model
//!
//! ```no_run
//! use quince::{ConversionOptions, DocumentConverter};
//!
//! # async fn example(document: quince::docx::Document) {
//! let converter = DocumentConverter::new(ConversionOptions::new());
//! let result = converter.convert(&document).await;
//! println!("{}", result.value);
//! for message in &result.messages {
//!     eprintln!("{}", message.text());
//! }
//! # }
//! ```
//!
//! # Example - A custom style map
//!
//! ```
//! use quince::{read_style_map, ConversionOptions};
//!
//! let style_map = read_style_map("p[style-name='Quote'] => blockquote:fresh");
//! assert!(style_map.messages.is_empty());
//! let options = ConversionOptions::new().style_map(style_map.value);
//! ```

pub mod common;
pub mod convert;
pub mod docx;
pub mod html;
pub mod stylemap;
pub mod xml;

pub use common::{Error, Message, Result, WithMessages};
pub use convert::images::{ConvertImage, DataUriConverter};
pub use convert::{ConversionOptions, DocumentConverter};
pub use html::write::OutputFormat;
pub use stylemap::{read_style_map, StyleMap};
