// Copyright (C) 2021 Scott Lamb <slamb@slamb.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use assert_matches::assert_matches;
use test_suite::{init_logging, parse, parse_bytes, starts, text, Start};
use xml::reader::XmlEvent;
use xml_outputter::{
    serialize, serialize_element, Comment, DocType, Document, Element, ErrorKind, Format,
    Namespace, ProcessingInstruction,
};

const SOAP: &str = "http://www.w3.org/2003/05/soap-envelope";
const WSA: &str = "http://www.w3.org/2005/08/addressing";
const TDS: &str = "http://www.onvif.org/ver10/device/wsdl";

fn soap_request() -> Document {
    let s = Namespace::new("s", SOAP);
    let a = Namespace::new("a", WSA);
    let tds = Namespace::new("", TDS);
    Document::new(
        Element::with_namespace("Envelope", s.clone())
            .with_child(
                Element::with_namespace("Header", s.clone()).with_child(
                    Element::with_namespace("Action", a.clone())
                        .with_namespaced_attribute("mustUnderstand", s.clone(), "1")
                        .with_text("http://www.onvif.org/ver10/device/wsdl/GetSystemDateAndTime"),
                ),
            )
            .with_child(
                Element::with_namespace("Body", s)
                    .with_child(Element::with_namespace("GetSystemDateAndTime", tds)),
            ),
    )
}

#[test]
fn soap_envelope() {
    init_logging();
    let out = serialize(&soap_request())
        .format(Format::indented("  ", true).line_separator("\n"))
        .to_string()
        .unwrap();
    log::info!("serialized: {}", out);
    assert_eq!(
        out,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope">
  <s:Header>
    <a:Action xmlns:a="http://www.w3.org/2005/08/addressing" s:mustUnderstand="1">http://www.onvif.org/ver10/device/wsdl/GetSystemDateAndTime</a:Action>
  </s:Header>
  <s:Body>
    <GetSystemDateAndTime xmlns="http://www.onvif.org/ver10/device/wsdl" />
  </s:Body>
</s:Envelope>
"#
    );

    let starts = starts(&out);
    let names: Vec<_> = starts
        .iter()
        .map(|s| (s.local_name.as_str(), s.namespace.as_deref()))
        .collect();
    assert_eq!(
        names,
        [
            ("Envelope", Some(SOAP)),
            ("Header", Some(SOAP)),
            ("Action", Some(WSA)),
            ("Body", Some(SOAP)),
            ("GetSystemDateAndTime", Some(TDS)),
        ]
    );
    assert_eq!(
        starts[2].attributes,
        [(
            "mustUnderstand".to_owned(),
            Some(SOAP.to_owned()),
            "1".to_owned()
        )]
    );
}

#[test]
fn xhtml_with_doc_type() {
    init_logging();
    let xhtml = Namespace::new("", "http://www.w3.org/1999/xhtml");
    let mut doc = Document::new(
        Element::with_namespace("html", xhtml.clone())
            .with_namespaced_attribute("lang", Namespace::XML, "en")
            .with_child(
                Element::with_namespace("head", xhtml.clone())
                    .with_child(Element::with_namespace("title", xhtml.clone()).with_text("Q&A")),
            )
            .with_child(
                Element::with_namespace("body", xhtml.clone()).with_child(
                    Element::with_namespace("p", xhtml)
                        .with_attribute("class", "a \"quoted\" class")
                        .with_text("1 < 2")
                        .with_entity("nbsp"),
                ),
            ),
    )
    .with_doc_type(
        DocType::new("html")
            .with_public_id("-//W3C//DTD XHTML 1.0 Strict//EN")
            .with_system_id("http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd"),
    );
    doc.push_before_root(ProcessingInstruction::new(
        "xml-stylesheet",
        r#"type="text/css" href="style.css""#,
    ));
    doc.push_after_root(Comment::new(" generated "));

    let out = serialize(&doc)
        .format(Format::indented("\t", true).line_separator("\n"))
        .to_string()
        .unwrap();
    assert_eq!(
        out,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \
         \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">\n\
         <?xml-stylesheet type=\"text/css\" href=\"style.css\"?>\n\
         <html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en\">\n\
         \t<head>\n\
         \t\t<title>Q&amp;A</title>\n\
         \t</head>\n\
         \t<body>\n\
         \t\t<p class=\"a &quot;quoted&quot; class\">\n\
         1 &lt; 2&nbsp;\t\t</p>\n\
         \t</body>\n\
         </html>\n\
         <!-- generated -->\n"
    );
}

#[test]
fn namespace_declared_once_per_branch() {
    init_logging();
    let n = Namespace::new("n", "urn:n");
    let root = Element::with_namespace("root", n.clone())
        .with_child(
            Element::with_namespace("a", n.clone())
                .with_child(Element::with_namespace("deep", n.clone())),
        )
        .with_child(Element::with_namespace("b", n));
    let out = serialize_element(&root).to_string().unwrap();
    assert_eq!(out.matches("xmlns").count(), 1);
    assert!(out.starts_with("<n:root xmlns:n=\"urn:n\">"));
    assert!(starts(&out)
        .iter()
        .all(|s| s.namespace.as_deref() == Some("urn:n")));
}

#[test]
fn shadowed_prefix_always_redeclared() {
    init_logging();
    for depth in 1..5 {
        let mut e = Element::with_namespace("leaf", Namespace::new("p", "urn:inner"));
        for _ in 0..depth {
            e = Element::with_namespace("wrap", Namespace::new("p", "urn:outer")).with_child(e);
        }
        let out = serialize_element(&e).to_string().unwrap();
        assert_eq!(out.matches("xmlns:p=\"urn:outer\"").count(), 1, "{}", out);
        assert_eq!(out.matches("xmlns:p=\"urn:inner\"").count(), 1, "{}", out);
        let starts = starts(&out);
        assert_matches!(starts.last(), Some(Start { local_name, namespace: Some(ns), .. }) => {
            assert_eq!(local_name, "leaf");
            assert_eq!(ns, "urn:inner");
        });
    }
}

#[test]
fn text_survives_reparse() {
    init_logging();
    let nasty = "<tag attr='x'> & \"quotes\" ]]> \u{e9}\u{65e5}";
    let doc = Document::new(
        Element::new("root")
            .with_attribute("a", nasty)
            .with_child(Element::new("t").with_text(nasty))
            .with_cdata("raw <stuff>"),
    );
    let out = serialize(&doc).to_string().unwrap();
    let starts = starts(&out);
    assert_eq!(starts[0].attributes[0].2, nasty);
    assert_eq!(text(&out), format!("{}raw <stuff>", nasty));
}

#[test]
fn encoded_output_reparses() {
    init_logging();
    let doc = soap_request();
    let mut bytes = Vec::new();
    serialize(&doc).to(&mut bytes).unwrap();
    let from_bytes = String::from_utf8(bytes).unwrap();
    assert_eq!(from_bytes, serialize(&doc).to_string().unwrap());
    assert!(!parse(&from_bytes).is_empty());
}

#[test]
fn encoding_override_applies_to_one_call() {
    init_logging();
    let doc = Document::new(Element::new("r").with_text("\u{e9}"));
    let format = Format::default().line_separator("\n");

    let mut latin1 = Vec::new();
    serialize(&doc)
        .format(format.clone())
        .encoding("latin1")
        .to(&mut latin1)
        .unwrap();
    assert!(latin1.ends_with(b"<r>\xe9</r>"));
    assert!(latin1.starts_with(b"<?xml version=\"1.0\" encoding=\"latin1\"?>"));

    let mut utf8 = Vec::new();
    serialize(&doc).format(format).to(&mut utf8).unwrap();
    assert!(utf8.ends_with("<r>\u{e9}</r>".as_bytes()));
}

/// The parser must decode each encoding back to the same text.
#[test]
fn declared_encoding_matches_bytes() {
    init_logging();
    let doc = Document::new(Element::new("r").with_text("caf\u{e9} \u{20ac} \u{65e5}"));
    for label in ["UTF-16", "UTF-16LE", "UTF-16BE", "ISO-8859-1", "US-ASCII"] {
        let mut bytes = Vec::new();
        serialize(&doc).encoding(label).to(&mut bytes).unwrap();
        if label == "US-ASCII" {
            assert!(bytes.is_ascii());
        }
        let text: String = parse_bytes(&bytes)
            .into_iter()
            .filter_map(|e| match e {
                XmlEvent::Characters(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(text, "caf\u{e9} \u{20ac} \u{65e5}", "{}", label);
    }
}

#[test]
fn unknown_encoding() {
    init_logging();
    let doc = Document::new(Element::new("r"));
    let e = serialize(&doc)
        .format(Format::default().encoding("x-made-up"))
        .to(Vec::new())
        .unwrap_err();
    assert_matches!(e.kind(), ErrorKind::UnsupportedEncoding(label) if label == "x-made-up");
    assert_eq!(e.to_string(), "unsupported encoding \"x-made-up\"");
}

/// Each call owns its format, so threads sharing a document can't affect one
/// another's output.
#[test]
fn concurrent_serialization() {
    init_logging();
    let doc = Arc::new(soap_request());
    let compact = serialize(&doc).to_string().unwrap();
    let pretty = serialize(&doc)
        .format(Format::indented("  ", true))
        .to_string()
        .unwrap();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let doc = Arc::clone(&doc);
            std::thread::spawn(move || {
                let format = if i % 2 == 0 {
                    Format::default()
                } else {
                    Format::indented("  ", true)
                };
                (0..50)
                    .map(|_| serialize(&doc).format(format.clone()).to_string().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    for (i, h) in handles.into_iter().enumerate() {
        let expected = if i % 2 == 0 { &compact } else { &pretty };
        for out in h.join().unwrap() {
            assert_eq!(&out, expected);
        }
    }
}
