// Copyright (C) 2021 Scott Lamb <slamb@slamb.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialization from a document tree to XML text.

mod scope;
mod sink;

use std::{
    io::{BufWriter, Write},
    sync::Arc,
};

use log::{debug, trace};

use crate::escape::{escape_attribute_value, escape_text};
use crate::tree::{Content, DocType, Document, Element, Misc, Namespace};
use crate::Format;

pub use scope::NamespaceScope;
use sink::{EncodingWriter, Sink};

/// The cause of an [`Error`].
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Writing to or flushing the destination failed. Whatever was written
    /// before the failure is left there.
    Io(std::io::Error),

    /// The requested encoding label isn't known.
    UnsupportedEncoding(String),
}

/// An error while serializing.
///
/// Cloning an `Error` is cheap.
#[derive(Clone, Debug)]
pub struct Error(Arc<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    fn unsupported_encoding(label: &str) -> Self {
        Error(Arc::new(ErrorKind::UnsupportedEncoding(label.to_owned())))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error(Arc::new(ErrorKind::Io(e)))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &*self.0 {
            ErrorKind::Io(e) => write!(f, "unable to write XML: {}", e),
            ErrorKind::UnsupportedEncoding(label) => {
                write!(f, "unsupported encoding {:?}", label)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &*self.0 {
            ErrorKind::Io(e) => Some(e),
            ErrorKind::UnsupportedEncoding(_) => None,
        }
    }
}

/// How an element's content is laid out.
enum Shape<'d> {
    /// No content: `<e />`.
    Empty,

    /// A single text node: `<e>text</e>` on one line.
    Text(&'d str),

    /// Anything else: the start and end tags on their own lines.
    Mixed,
}

impl<'d> Shape<'d> {
    fn of(content: &'d [Content]) -> Self {
        match content {
            [] => Shape::Empty,
            [Content::Text(t)] => Shape::Text(t),
            _ => Shape::Mixed,
        }
    }
}

/// Writes a tree to a [`Sink`] according to a [`Format`].
struct Printer<'f, 'o> {
    format: &'f Format,
    out: &'o mut dyn Sink,
}

impl<'f, 'o> Printer<'f, 'o> {
    #[inline]
    fn write(&mut self, s: &str) -> Result<(), Error> {
        self.out.write_str(s)
    }

    fn indent(&mut self, depth: usize) -> Result<(), Error> {
        let format = self.format;
        if format.indenting && !format.indent.is_empty() {
            for _ in 0..depth {
                self.write(&format.indent)?;
            }
        }
        Ok(())
    }

    fn maybe_newline(&mut self) -> Result<(), Error> {
        let format = self.format;
        if format.newlines {
            self.write(&format.line_separator)?;
        }
        Ok(())
    }

    fn document(&mut self, document: &Document, encoding: &str) -> Result<(), Error> {
        self.declaration(encoding)?;
        if let Some(doc_type) = document.doc_type() {
            self.doc_type(doc_type)?;
        }
        for misc in document.before_root() {
            self.misc(misc, 0)?;
        }
        self.element(document.root(), 0, &mut NamespaceScope::new())?;
        for misc in document.after_root() {
            self.misc(misc, 0)?;
        }
        Ok(())
    }

    /// Writes `<?xml version="1.0" encoding="..."?>` and a line separator,
    /// even when newlines are otherwise off.
    fn declaration(&mut self, encoding: &str) -> Result<(), Error> {
        let format = self.format;
        if format.suppress_declaration {
            return Ok(());
        }
        self.write("<?xml version=\"1.0\"")?;
        if !format.omit_encoding {
            self.write(" encoding=\"")?;
            self.write(Format::declared_encoding(encoding))?;
            self.write("\"")?;
        }
        self.write("?>")?;
        self.write(&format.line_separator)
    }

    fn doc_type(&mut self, doc_type: &DocType) -> Result<(), Error> {
        self.write("<!DOCTYPE ")?;
        self.write(doc_type.element_name())?;
        let public_id = doc_type.public_id().filter(|id| !id.is_empty());
        if let Some(id) = public_id {
            self.write(" PUBLIC \"")?;
            self.write(id)?;
            self.write("\"")?;
        }
        if let Some(id) = doc_type.system_id().filter(|id| !id.is_empty()) {
            if public_id.is_none() {
                self.write(" SYSTEM")?;
            }
            self.write(" \"")?;
            self.write(id)?;
            self.write("\"")?;
        }
        self.write(">")?;
        self.maybe_newline()
    }

    /// Writes a comment, processing instruction, or CDATA section on its own line.
    fn misc(&mut self, misc: &Misc, depth: usize) -> Result<(), Error> {
        self.opaque(&misc.serialized_form(), depth)
    }

    fn opaque(&mut self, serialized_form: &str, depth: usize) -> Result<(), Error> {
        self.indent(depth)?;
        self.write(serialized_form)?;
        self.maybe_newline()
    }

    /// Declares `namespace` on the start tag being written, unless it's already
    /// in scope with the same uri.
    ///
    /// The uri is escaped as an attribute value, so a `"` or `&` in it can't
    /// break the start tag; any other uri is written as given.
    fn declare<'d>(
        &mut self,
        namespace: &'d Namespace,
        scope: &mut NamespaceScope<'d>,
    ) -> Result<(), Error> {
        if !scope.needs_declaration(namespace) {
            return Ok(());
        }
        trace!("declaring {}", namespace);
        scope.push(namespace);
        self.write(" xmlns")?;
        if !namespace.prefix().is_empty() {
            self.write(":")?;
            self.write(namespace.prefix())?;
        }
        self.write("=\"")?;
        self.write(&escape_attribute_value(namespace.uri()))?;
        self.write("\"")
    }

    fn element<'d>(
        &mut self,
        element: &'d Element,
        depth: usize,
        scope: &mut NamespaceScope<'d>,
    ) -> Result<(), Error> {
        let name = element.qualified_name();
        self.indent(depth)?;
        self.write("<")?;
        self.write(&name)?;

        let mark = scope.len();
        self.declare(element.namespace(), scope)?;
        for attribute in element.attributes() {
            self.declare(attribute.namespace(), scope)?;
            self.write(" ")?;
            self.write(&attribute.qualified_name())?;
            self.write("=\"")?;
            self.write(&escape_attribute_value(attribute.value()))?;
            self.write("\"")?;
        }

        let result = self.content(element, &name, depth, scope);
        scope.pop_to(mark);
        result
    }

    fn content<'d>(
        &mut self,
        element: &'d Element,
        name: &str,
        depth: usize,
        scope: &mut NamespaceScope<'d>,
    ) -> Result<(), Error> {
        match Shape::of(element.content()) {
            // An empty text node is written the same as no content at all.
            Shape::Empty | Shape::Text("") => self.write(" />")?,
            Shape::Text(text) => {
                self.write(">")?;
                self.write(&escape_text(text))?;
                self.end_tag(name)?;
            }
            Shape::Mixed => {
                self.write(">")?;
                self.maybe_newline()?;
                for content in element.content() {
                    match content {
                        Content::Text(text) => self.write(&escape_text(text))?,
                        Content::Element(child) => self.element(child, depth + 1, scope)?,
                        Content::Comment(c) => self.opaque(&c.serialized_form(), depth + 1)?,
                        Content::ProcessingInstruction(pi) => {
                            self.opaque(&pi.serialized_form(), depth + 1)?
                        }
                        Content::CData(c) => self.opaque(&c.serialized_form(), depth + 1)?,
                        Content::Entity(e) => self.write(&e.serialized_form())?,
                    }
                }
                self.indent(depth)?;
                self.end_tag(name)?;
            }
        }
        self.maybe_newline()
    }

    fn end_tag(&mut self, name: &str) -> Result<(), Error> {
        self.write("</")?;
        self.write(name)?;
        self.write(">")
    }
}

#[derive(Copy, Clone)]
enum Node<'a> {
    Document(&'a Document),
    Element(&'a Element),
}

/// Serializer for a document or element; returned by [`serialize`] or
/// [`serialize_element`].
///
/// The [`Format`] is owned by the serializer, so a call's output can't be
/// affected by changes made elsewhere while it runs.
#[derive(Clone)]
pub struct Serializer<'a> {
    node: Node<'a>,
    format: Format,
    encoding: Option<&'a str>,
}

impl<'a> Serializer<'a> {
    /// Sets the formatting choices; defaults to [`Format::default`].
    #[inline]
    pub fn format(self, format: Format) -> Self {
        Self { format, ..self }
    }

    /// Overrides the format's encoding for this serialization only.
    ///
    /// This is both the name written in the declaration and the encoding used
    /// by [`Serializer::to`].
    #[inline]
    pub fn encoding(self, encoding: &'a str) -> Self {
        Self {
            encoding: Some(encoding),
            ..self
        }
    }

    fn effective_encoding(&self) -> &str {
        self.encoding.unwrap_or(self.format.encoding.as_str())
    }

    fn write_to(&self, out: &mut dyn Sink) -> Result<(), Error> {
        let encoding = self.effective_encoding();
        let mut printer = Printer {
            format: &self.format,
            out,
        };
        match self.node {
            Node::Document(d) => {
                debug!(
                    "serializing document with root <{}>",
                    d.root().qualified_name()
                );
                printer.document(d, encoding)
            }
            Node::Element(e) => {
                debug!("serializing element <{}>", e.qualified_name());
                printer.element(e, 0, &mut NamespaceScope::new())
            }
        }
    }

    /// Serializes to any `Write` impl, encoding characters with the chosen
    /// encoding and flushing once done.
    ///
    /// On error, whatever was already written stays written.
    pub fn to<W: Write>(self, writer: W) -> Result<(), Error> {
        let mut out = EncodingWriter::new(BufWriter::new(writer), self.effective_encoding())?;
        self.write_to(&mut out)?;
        out.finish()?;
        debug!("serialization complete");
        Ok(())
    }

    /// Serializes to a `String`.
    ///
    /// No encoding step happens, but the declaration still names the chosen
    /// encoding.
    pub fn to_string(self) -> Result<String, Error> {
        let mut out = String::new();
        self.write_to(&mut out)?;
        Ok(out)
    }
}

/// Serializes the given document: the declaration, DOCTYPE, and content.
#[inline]
pub fn serialize(document: &Document) -> Serializer {
    Serializer {
        node: Node::Document(document),
        format: Format::default(),
        encoding: None,
    }
}

/// Serializes a single element and its descendants, without any declaration.
///
/// The element is written as if it were a root: every namespace it uses is
/// declared on it or below it.
#[inline]
pub fn serialize_element(element: &Element) -> Serializer {
    Serializer {
        node: Node::Element(element),
        format: Format::default(),
        encoding: None,
    }
}
