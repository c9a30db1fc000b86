// Copyright (C) 2021 Scott Lamb <slamb@slamb.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The document tree consumed by [`crate::ser`].
//!
//! This is an owned tree: a [`Document`] owns its root [`Element`], and each
//! element owns its attributes and content. There are no parent links; the
//! serializer tracks what's in scope on the way down.

use std::borrow::Cow;

use crate::XML_NS;

/// A `(prefix, uri)` pair.
///
/// Two namespaces are equal iff both the prefix and the uri are equal. An
/// empty prefix is the default namespace.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Namespace {
    prefix: Cow<'static, str>,
    uri: Cow<'static, str>,
}

impl Namespace {
    /// The absence of a namespace. Never declared.
    pub const NONE: Namespace = Namespace {
        prefix: Cow::Borrowed(""),
        uri: Cow::Borrowed(""),
    };

    /// The namespace implicitly bound to the `xml` prefix. Never declared.
    pub const XML: Namespace = Namespace {
        prefix: Cow::Borrowed("xml"),
        uri: Cow::Borrowed(XML_NS),
    };

    pub fn new(prefix: impl Into<Cow<'static, str>>, uri: impl Into<Cow<'static, str>>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns true unless this is [`Namespace::NONE`] or [`Namespace::XML`].
    pub fn is_declarable(&self) -> bool {
        *self != Self::NONE && *self != Self::XML
    }

    fn qualify<'a>(&self, local_name: &'a str) -> Cow<'a, str> {
        if self.prefix.is_empty() {
            Cow::Borrowed(local_name)
        } else {
            Cow::Owned(format!("{}:{}", self.prefix, local_name))
        }
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::NONE
    }
}

/// Displays the declaration form, e.g. `xmlns:foo="http://example.com/foo"`.
impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "xmlns=\"{}\"", self.uri)
        } else {
            write!(f, "xmlns:{}=\"{}\"", self.prefix, self.uri)
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attribute {
    name: String,
    namespace: Namespace,
    value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_namespace(name, Namespace::NONE, value)
    }

    pub fn with_namespace(
        name: impl Into<String>,
        namespace: Namespace,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace,
            value: value.into(),
        }
    }

    /// The local name, without any prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The unescaped value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The name as written: `prefix:name`, or just `name` when unprefixed.
    pub fn qualified_name(&self) -> Cow<'_, str> {
        self.namespace.qualify(&self.name)
    }
}

/// A node within an element's mixed content.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Content {
    /// Character data, unescaped.
    Text(String),
    Element(Element),
    Comment(Comment),
    ProcessingInstruction(ProcessingInstruction),
    CData(CData),
    Entity(EntityRef),
}

impl From<Element> for Content {
    fn from(e: Element) -> Self {
        Content::Element(e)
    }
}

impl From<Comment> for Content {
    fn from(c: Comment) -> Self {
        Content::Comment(c)
    }
}

impl From<ProcessingInstruction> for Content {
    fn from(pi: ProcessingInstruction) -> Self {
        Content::ProcessingInstruction(pi)
    }
}

impl From<CData> for Content {
    fn from(c: CData) -> Self {
        Content::CData(c)
    }
}

impl From<EntityRef> for Content {
    fn from(e: EntityRef) -> Self {
        Content::Entity(e)
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::Text(s)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::Text(s.to_owned())
    }
}

/// An element: a (possibly namespaced) name, attributes, and mixed content.
///
/// Attribute names are expected to be unique by local name and namespace;
/// this isn't checked here or at serialization time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Element {
    name: String,
    namespace: Namespace,
    attributes: Vec<Attribute>,
    content: Vec<Content>,
}

impl Element {
    /// Creates an empty element in no namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_namespace(name, Namespace::NONE)
    }

    pub fn with_namespace(name: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            name: name.into(),
            namespace,
            attributes: Vec::new(),
            content: Vec::new(),
        }
    }

    /// The local name, without any prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The name as written: `prefix:name`, or just `name` when unprefixed.
    pub fn qualified_name(&self) -> Cow<'_, str> {
        self.namespace.qualify(&self.name)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Looks up an attribute by local name and namespace.
    pub fn attribute(&self, name: &str, namespace: &Namespace) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.name == name && a.namespace.uri() == namespace.uri())
    }

    pub fn content(&self) -> &[Content] {
        &self.content
    }

    /// Returns the concatenation of the direct text children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for c in &self.content {
            if let Content::Text(t) = c {
                out.push_str(t);
            }
        }
        out
    }

    /// Returns the direct child elements, in order.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.content.iter().filter_map(|c| match c {
            Content::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn push_content(&mut self, content: impl Into<Content>) {
        self.content.push(content.into());
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_attribute(Attribute::new(name, value));
        self
    }

    pub fn with_namespaced_attribute(
        mut self,
        name: impl Into<String>,
        namespace: Namespace,
        value: impl Into<String>,
    ) -> Self {
        self.push_attribute(Attribute::with_namespace(name, namespace, value));
        self
    }

    pub fn with_content(mut self, content: impl Into<Content>) -> Self {
        self.push_content(content);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_content(Content::Text(text.into()))
    }

    pub fn with_child(self, child: Element) -> Self {
        self.with_content(child)
    }

    pub fn with_comment(self, text: impl Into<String>) -> Self {
        self.with_content(Comment::new(text))
    }

    pub fn with_processing_instruction(
        self,
        target: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        self.with_content(ProcessingInstruction::new(target, data))
    }

    pub fn with_cdata(self, text: impl Into<String>) -> Self {
        self.with_content(CData::new(text))
    }

    pub fn with_entity(self, name: impl Into<String>) -> Self {
        self.with_content(EntityRef::new(name))
    }
}

/// A comment. Its text is written verbatim between `<!--` and `-->`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comment(String);

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn serialized_form(&self) -> String {
        format!("<!--{}-->", self.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcessingInstruction {
    target: String,
    data: String,
}

impl ProcessingInstruction {
    pub fn new(target: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            data: data.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// `<?target data?>`, or `<?target?>` when there's no data.
    pub fn serialized_form(&self) -> String {
        if self.data.is_empty() {
            format!("<?{}?>", self.target)
        } else {
            format!("<?{} {}?>", self.target, self.data)
        }
    }
}

/// A CDATA section. Its text is written verbatim, never escaped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CData(String);

impl CData {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn serialized_form(&self) -> String {
        format!("<![CDATA[{}]]>", self.0)
    }
}

/// A reference to a named entity, e.g. `&nbsp;`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntityRef(String);

impl EntityRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn serialized_form(&self) -> String {
        format!("&{};", self.0)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DocType {
    element_name: String,
    public_id: Option<String>,
    system_id: Option<String>,
}

impl DocType {
    pub fn new(element_name: impl Into<String>) -> Self {
        Self {
            element_name: element_name.into(),
            public_id: None,
            system_id: None,
        }
    }

    pub fn with_public_id(self, public_id: impl Into<String>) -> Self {
        Self {
            public_id: Some(public_id.into()),
            ..self
        }
    }

    pub fn with_system_id(self, system_id: impl Into<String>) -> Self {
        Self {
            system_id: Some(system_id.into()),
            ..self
        }
    }

    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    pub fn public_id(&self) -> Option<&str> {
        self.public_id.as_deref()
    }

    pub fn system_id(&self) -> Option<&str> {
        self.system_id.as_deref()
    }
}

/// A node allowed at the top level of a document besides the root element.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Misc {
    Comment(Comment),
    ProcessingInstruction(ProcessingInstruction),
    CData(CData),
}

impl Misc {
    pub fn serialized_form(&self) -> String {
        match self {
            Misc::Comment(c) => c.serialized_form(),
            Misc::ProcessingInstruction(pi) => pi.serialized_form(),
            Misc::CData(c) => c.serialized_form(),
        }
    }
}

impl From<Comment> for Misc {
    fn from(c: Comment) -> Self {
        Misc::Comment(c)
    }
}

impl From<ProcessingInstruction> for Misc {
    fn from(pi: ProcessingInstruction) -> Self {
        Misc::ProcessingInstruction(pi)
    }
}

impl From<CData> for Misc {
    fn from(c: CData) -> Self {
        Misc::CData(c)
    }
}

/// A document: an optional DOCTYPE and exactly one root element, with any
/// number of [`Misc`] nodes before and after it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Document {
    doc_type: Option<DocType>,
    before_root: Vec<Misc>,
    root: Element,
    after_root: Vec<Misc>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            doc_type: None,
            before_root: Vec::new(),
            root,
            after_root: Vec::new(),
        }
    }

    pub fn with_doc_type(mut self, doc_type: DocType) -> Self {
        self.doc_type = Some(doc_type);
        self
    }

    pub fn set_doc_type(&mut self, doc_type: Option<DocType>) {
        self.doc_type = doc_type;
    }

    pub fn doc_type(&self) -> Option<&DocType> {
        self.doc_type.as_ref()
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Replaces the root element, returning the old one.
    pub fn set_root(&mut self, root: Element) -> Element {
        std::mem::replace(&mut self.root, root)
    }

    pub fn before_root(&self) -> &[Misc] {
        &self.before_root
    }

    pub fn after_root(&self) -> &[Misc] {
        &self.after_root
    }

    /// Appends a node between the prolog and the root element.
    pub fn push_before_root(&mut self, misc: impl Into<Misc>) {
        self.before_root.push(misc.into());
    }

    /// Appends a node after the root element.
    pub fn push_after_root(&mut self, misc: impl Into<Misc>) {
        self.after_root.push(misc.into());
    }
}
