//! XML text read/write support.
//!
//! Renders an [`Element`] tree to XML text and parses it back. Leaf text is
//! preserved exactly; whitespace-only text between child elements (i.e.
//! indentation) is discarded. Attributes, comments, processing instructions
//! and declarations on input are ignored.

use std::io::Write;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

use crate::error::EntityError;
use crate::node::Element;

/// Error type for XML text operations.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8 in XML: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("malformed XML document: {reason}")]
    Structure { reason: String },

    #[error(transparent)]
    Entity(#[from] EntityError),
}

impl XmlError {
    fn structure(reason: impl Into<String>) -> Self {
        Self::Structure {
            reason: reason.into(),
        }
    }
}

/// Result alias for XML text operations.
pub type Result<T> = std::result::Result<T, XmlError>;

/// Options controlling XML text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level; `0` writes everything on one line.
    pub indent: usize,
    /// Emit an `<?xml ...?>` declaration before the root element.
    pub declaration: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            declaration: false,
        }
    }
}

impl WriteOptions {
    /// Single-line output without a declaration.
    pub fn compact() -> Self {
        Self {
            indent: 0,
            declaration: false,
        }
    }
}

/// Renders an element tree as XML text.
pub fn to_string(root: &Element, options: &WriteOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_to(&mut buf, root, options)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes an element tree as XML text to the given writer.
pub fn write_to<W: Write>(writer: W, root: &Element, options: &WriteOptions) -> Result<()> {
    let mut writer = if options.indent > 0 {
        Writer::new_with_indent(writer, b' ', options.indent)
    } else {
        Writer::new(writer)
    };
    if options.declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    }
    write_element(&mut writer, root)?;
    debug!(root = root.name(), "rendered XML document");
    Ok(())
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let name = element.name();
    if element.is_leaf() && element.text().is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new(name)))?;
    if element.is_leaf() {
        writer.write_event(Event::Text(BytesText::new(element.text())))?;
    } else {
        for child in element.children() {
            write_element(writer, child)?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Parses XML text into an element tree.
///
/// The document must contain exactly one root element.
pub fn from_str(input: &str) -> Result<Element> {
    let mut reader = Reader::from_str(input);
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(XmlError::structure("multiple root elements"));
                }
                open.push(Element::new(element_name(&start)?));
            }
            Event::Empty(start) => {
                if root.is_some() {
                    return Err(XmlError::structure("multiple root elements"));
                }
                attach(&mut open, &mut root, Element::new(element_name(&start)?));
            }
            Event::End(_) => {
                let mut element = open
                    .pop()
                    .ok_or_else(|| XmlError::structure("unexpected closing tag"))?;
                if !element.is_leaf() && element.text().trim().is_empty() {
                    element.clear_text();
                }
                attach(&mut open, &mut root, element);
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                append_text(&mut open, &text)?;
            }
            Event::CData(data) => {
                let text = std::str::from_utf8(&data)?;
                append_text(&mut open, text)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(XmlError::structure(format!(
            "element <{}> is never closed",
            unclosed.name()
        )));
    }
    let root = root.ok_or_else(|| XmlError::structure("document has no root element"))?;
    debug!(root = root.name(), children = root.children().len(), "parsed XML document");
    Ok(root)
}

fn element_name(start: &BytesStart<'_>) -> Result<String> {
    Ok(std::str::from_utf8(start.name().as_ref())?.to_owned())
}

fn attach(open: &mut [Element], root: &mut Option<Element>, element: Element) {
    match open.last_mut() {
        Some(parent) => parent.push(element),
        None => *root = Some(element),
    }
}

fn append_text(open: &mut [Element], text: &str) -> Result<()> {
    match open.last_mut() {
        Some(element) => element.push_text(text),
        None if text.trim().is_empty() => {}
        None => return Err(XmlError::structure("text outside the root element")),
    }
    Ok(())
}
