// Copyright (C) 2021 Scott Lamb <slamb@slamb.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renders an in-memory XML document tree as XML text.
//!
//! Build a [`Document`] (see the [`tree`] module), pick a [`Format`], and hand
//! both to [`serialize`]:
//!
//! ```
//! use xml_outputter::{serialize, Document, Element, Format, Namespace};
//!
//! let ns = Namespace::new("", "urn:a");
//! let doc = Document::new(
//!     Element::with_namespace("root", ns)
//!         .with_child(Element::new("child").with_attribute("attr", "x&y")),
//! );
//! let out = serialize(&doc)
//!     .format(Format::indented("  ", true).line_separator("\n"))
//!     .to_string()
//!     .unwrap();
//! assert_eq!(
//!     out,
//!     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
//!      <root xmlns=\"urn:a\">\n  <child attr=\"x&amp;y\" />\n</root>\n"
//! );
//! ```

pub mod escape;
pub mod format;
pub mod ser;
pub mod tree;

pub use format::Format;
pub use ser::{serialize, serialize_element, Error, ErrorKind, NamespaceScope};
pub use tree::{
    Attribute, CData, Comment, Content, DocType, Document, Element, EntityRef, Misc, Namespace,
    ProcessingInstruction,
};

/// The namespace bound to the reserved `xml` prefix.
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
