//! Image conversion.
//!
//! Conversion is asynchronous so converters can fetch or transcode bytes;
//! results are spliced into the output tree in document order.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::common::Result;
use crate::docx::Image;
use crate::html::{fresh_element, HtmlNode};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Turns an image element into output nodes.
///
/// A failing conversion degrades that image to nothing and surfaces the
/// error as a message; it never aborts the document.
pub trait ConvertImage: Send + Sync {
    fn convert<'a>(&'a self, image: &'a Image) -> BoxFuture<'a, Result<Vec<HtmlNode>>>;
}

/// The default converter: inline the bytes as a base64 `data:` URI.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriConverter;

impl ConvertImage for DataUriConverter {
    fn convert<'a>(&'a self, image: &'a Image) -> BoxFuture<'a, Result<Vec<HtmlNode>>> {
        Box::pin(async move {
            let bytes = image.read()?;
            let src = format!(
                "data:{};base64,{}",
                image.content_type.as_deref().unwrap_or(""),
                STANDARD.encode(bytes)
            );
            let mut attributes = BTreeMap::new();
            if let Some(alt_text) = &image.alt_text {
                attributes.insert("alt".to_string(), alt_text.clone());
            }
            attributes.insert("src".to_string(), src);
            Ok(vec![fresh_element("img", attributes, vec![])])
        })
    }
}
