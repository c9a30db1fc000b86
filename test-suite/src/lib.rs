// Copyright (C) 2021 Scott Lamb <slamb@slamb.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers shared by the integration tests.

use xml::reader::{EventReader, XmlEvent};

pub fn init_logging() {
    let _ = env_logger::Builder::new().is_test(true).try_init();
}

/// A start tag as seen by an independent parser, with prefixes resolved.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Start {
    pub local_name: String,
    pub namespace: Option<String>,

    /// `(local name, namespace, value)` of each attribute, in order.
    pub attributes: Vec<(String, Option<String>, String)>,
}

/// Parses `xml` with xml-rs, panicking if it isn't well-formed.
pub fn parse(xml: &str) -> Vec<XmlEvent> {
    EventReader::new(xml.as_bytes())
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| panic!("not well-formed: {}\n{}", e, xml))
}

/// Parses encoded `xml` with xml-rs, which picks the charset from the byte
/// order mark or declaration.
pub fn parse_bytes(xml: &[u8]) -> Vec<XmlEvent> {
    EventReader::new(xml)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| panic!("not well-formed: {}\n{:02x?}", e, xml))
}

/// Returns every start tag in `xml`, in document order.
pub fn starts(xml: &str) -> Vec<Start> {
    parse(xml)
        .into_iter()
        .filter_map(|e| match e {
            XmlEvent::StartElement {
                name, attributes, ..
            } => Some(Start {
                local_name: name.local_name,
                namespace: name.namespace,
                attributes: attributes
                    .into_iter()
                    .map(|a| (a.name.local_name, a.name.namespace, a.value))
                    .collect(),
            }),
            _ => None,
        })
        .collect()
}

/// Returns the concatenated character data of `xml`, ignoring whitespace-only runs.
pub fn text(xml: &str) -> String {
    let mut out = String::new();
    for e in parse(xml) {
        match e {
            XmlEvent::Characters(t) | XmlEvent::CData(t) => out.push_str(&t),
            _ => {}
        }
    }
    out
}
