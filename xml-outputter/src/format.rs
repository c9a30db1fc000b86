// Copyright (C) 2021 Scott Lamb <slamb@slamb.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Formatting choices for [`crate::ser`].

/// Formatting choices, captured by value for each serialization.
///
/// The defaults produce compact output: no indentation unit, no line breaks
/// except after the XML declaration, `\r\n` as the line separator, and a
/// `UTF-8` encoding declaration.
///
/// ```
/// use xml_outputter::Format;
///
/// let format = Format::default()
///     .indent_size(2)
///     .newlines(true)
///     .line_separator("\n");
/// assert_eq!(format.indent, "  ");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Format {
    /// The string written once per nesting level.
    pub indent: String,

    /// If false, `indent` is never written.
    pub indenting: bool,

    /// If false, no line separators are written except after the declaration.
    pub newlines: bool,

    pub line_separator: String,

    /// The encoding named in the declaration and used to write bytes.
    pub encoding: String,

    /// If true, the `<?xml ...?>` declaration is left out entirely.
    pub suppress_declaration: bool,

    /// If true, the declaration leaves out `encoding="..."`.
    pub omit_encoding: bool,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            indent: String::new(),
            indenting: true,
            newlines: false,
            line_separator: "\r\n".to_owned(),
            encoding: "UTF-8".to_owned(),
            suppress_declaration: false,
            omit_encoding: false,
        }
    }
}

impl Format {
    /// Returns the default format with the given indent unit and newline setting.
    pub fn indented(indent: &str, newlines: bool) -> Self {
        Self::default().indent(indent).newlines(newlines)
    }

    /// As [`Format::indented`], also setting the encoding.
    pub fn indented_with_encoding(indent: &str, newlines: bool, encoding: &str) -> Self {
        Self::indented(indent, newlines).encoding(encoding)
    }

    /// Sets the indent unit; defaults to empty.
    #[inline]
    pub fn indent(self, indent: &str) -> Self {
        Self {
            indent: indent.to_owned(),
            ..self
        }
    }

    /// Sets the indent unit to `n` spaces.
    #[inline]
    pub fn indent_size(self, n: usize) -> Self {
        Self {
            indent: " ".repeat(n),
            ..self
        }
    }

    /// Sets if the indent unit is written; defaults to true.
    #[inline]
    pub fn indenting(self, indenting: bool) -> Self {
        Self { indenting, ..self }
    }

    /// Sets if line separators are written after tags; defaults to false.
    #[inline]
    pub fn newlines(self, newlines: bool) -> Self {
        Self { newlines, ..self }
    }

    /// Sets the line separator; defaults to `\r\n`.
    #[inline]
    pub fn line_separator(self, line_separator: &str) -> Self {
        Self {
            line_separator: line_separator.to_owned(),
            ..self
        }
    }

    #[inline]
    pub fn encoding(self, encoding: &str) -> Self {
        Self {
            encoding: encoding.to_owned(),
            ..self
        }
    }

    #[inline]
    pub fn suppress_declaration(self, suppress_declaration: bool) -> Self {
        Self {
            suppress_declaration,
            ..self
        }
    }

    #[inline]
    pub fn omit_encoding(self, omit_encoding: bool) -> Self {
        Self {
            omit_encoding,
            ..self
        }
    }

    /// The name to put in the declaration for `encoding`.
    ///
    /// `UTF8` is a common label but not a registered charset name, so it's
    /// declared as `UTF-8`.
    pub(crate) fn declared_encoding(encoding: &str) -> &str {
        if encoding == "UTF8" {
            "UTF-8"
        } else {
            encoding
        }
    }
}
