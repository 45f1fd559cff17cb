//! Event-level markup output on top of `quick_xml::Writer`.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;

/// Streams elements, attributes, and text to an [`io::Write`].
///
/// A start tag stays open until its first child or text arrives, so
/// attributes can be added after [`start_element`](Self::start_element) and
/// elements without content are written in empty form. When indentation is
/// configured, child elements go on their own lines, except inside elements
/// that already hold text and inside subtrees where
/// [`suppress_indentation`](Self::suppress_indentation) was called.
pub struct MarkupSink<W: Write> {
    writer: Writer<W>,
    indent: Option<String>,
    pending: Option<BytesStart<'static>>,
    stack: Vec<Frame>,
    wrote_prolog: bool,
}

#[derive(Debug)]
struct Frame {
    name: String,
    has_children: bool,
    has_text: bool,
    pretty: bool,
}

impl<W: Write> MarkupSink<W> {
    /// Create a sink; `indent` is the per-level indentation unit.
    pub fn new(inner: W, indent: Option<&str>) -> Self {
        Self {
            writer: Writer::new(inner),
            indent: indent.filter(|unit| !unit.is_empty()).map(str::to_owned),
            pending: None,
            stack: Vec::new(),
            wrote_prolog: false,
        }
    }

    /// Write the `<?xml ...?>` declaration.
    pub fn declaration(&mut self) -> io::Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.wrote_prolog = true;
        Ok(())
    }

    /// Open an element.
    pub fn start_element(&mut self, name: &str) -> io::Result<()> {
        self.open_pending()?;
        let pretty = match self.stack.last_mut() {
            Some(parent) => {
                parent.has_children = true;
                parent.pretty && !parent.has_text
            }
            None => self.indent.is_some(),
        };
        if pretty && (!self.stack.is_empty() || self.wrote_prolog) {
            self.newline(self.stack.len())?;
        }
        self.pending = Some(BytesStart::new(name.to_owned()));
        self.stack.push(Frame {
            name: name.to_owned(),
            has_children: false,
            has_text: false,
            pretty,
        });
        Ok(())
    }

    /// Add an attribute to the element just opened.
    pub fn attribute(&mut self, name: &str, value: &str) -> io::Result<()> {
        let Some(start) = self.pending.as_mut() else {
            return Err(io::Error::other(format!(
                "attribute {name} written outside of a start tag"
            )));
        };
        start.push_attribute(Attribute {
            key: QName(name.as_bytes()),
            value: Cow::Owned(escape_attribute(value).into_owned().into_bytes()),
        });
        Ok(())
    }

    /// Write character data into the current element.
    pub fn text(&mut self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.open_pending()?;
        if let Some(frame) = self.stack.last_mut() {
            frame.has_text = true;
        }
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(escape_text(text))))?;
        Ok(())
    }

    /// Stop indenting inside the current element and its descendants.
    pub fn suppress_indentation(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.pretty = false;
        }
    }

    /// Close the current element.
    pub fn end_element(&mut self) -> io::Result<()> {
        let Some(frame) = self.stack.pop() else {
            return Err(io::Error::other("no element to close"));
        };
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        if frame.pretty && frame.has_children && !frame.has_text {
            self.newline(self.stack.len())?;
        }
        self.writer
            .write_event(Event::End(BytesEnd::new(frame.name)))?;
        Ok(())
    }

    /// Release the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn open_pending(&mut self) -> io::Result<()> {
        if let Some(start) = self.pending.take() {
            self.writer.write_event(Event::Start(start))?;
        }
        Ok(())
    }

    fn newline(&mut self, depth: usize) -> io::Result<()> {
        let Some(unit) = &self.indent else {
            return Ok(());
        };
        let whitespace = format!("\n{}", unit.repeat(depth));
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(whitespace)))?;
        Ok(())
    }
}

impl<W: Write> fmt::Debug for MarkupSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkupSink")
            .field("indent", &self.indent)
            .field("depth", &self.stack.len())
            .finish_non_exhaustive()
    }
}

/// Escape an attribute value. Whitespace characters other than space are
/// written as character references so attribute normalization keeps them.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape(value, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\t' => Some("&#x9;"),
        '\n' => Some("&#xA;"),
        '\r' => Some("&#xD;"),
        _ => None,
    })
}

/// Escape character data. Carriage returns are referenced so line-ending
/// normalization keeps them.
fn escape_text(value: &str) -> Cow<'_, str> {
    escape(value, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '\r' => Some("&#xD;"),
        _ => None,
    })
}

fn escape(value: &str, replacement: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    if !value.chars().any(|c| replacement(c).is_some()) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match replacement(c) {
            Some(reference) => escaped.push_str(reference),
            None => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
