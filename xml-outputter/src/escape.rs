// Copyright (C) 2021 Scott Lamb <slamb@slamb.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Replacing reserved characters with entity references.
//!
//! Both functions scan the input once. Runs of characters that need no
//! escaping are copied as-is; non-ASCII characters are never touched (that's
//! the output encoding's job). If nothing needs escaping, the input is
//! returned borrowed.

use std::borrow::Cow;

/// Escapes character data for use as element text: `<`, `>`, and `&`.
///
/// ```
/// use xml_outputter::escape::escape_text;
/// assert_eq!(escape_text("a < b && \"c\""), "a &lt; b &amp;&amp; \"c\"");
/// ```
pub fn escape_text(s: &str) -> Cow<'_, str> {
    escape(s, |b| match b {
        b'<' => Some("&lt;"),
        b'>' => Some("&gt;"),
        b'&' => Some("&amp;"),
        _ => None,
    })
}

/// Escapes an attribute value for use within double quotes.
///
/// In addition to the characters handled by [`escape_text`], escapes `"` and
/// `'`.
pub fn escape_attribute_value(s: &str) -> Cow<'_, str> {
    escape(s, |b| match b {
        b'<' => Some("&lt;"),
        b'>' => Some("&gt;"),
        b'&' => Some("&amp;"),
        b'"' => Some("&quot;"),
        b'\'' => Some("&apos;"),
        _ => None,
    })
}

/// All reserved characters are ASCII, so it's safe to scan bytes and slice at
/// their positions: they can never fall inside a multi-byte UTF-8 sequence.
#[inline]
fn escape(s: &str, entity_for: impl Fn(u8) -> Option<&'static str>) -> Cow<'_, str> {
    let mut out = String::new();
    let mut last = 0;
    for (i, &b) in s.as_bytes().iter().enumerate() {
        if let Some(entity) = entity_for(b) {
            if out.is_empty() {
                out.reserve(s.len() + 16);
            }
            out.push_str(&s[last..i]);
            out.push_str(entity);
            last = i + 1;
        }
    }
    if last == 0 {
        return Cow::Borrowed(s);
    }
    out.push_str(&s[last..]);
    Cow::Owned(out)
}
