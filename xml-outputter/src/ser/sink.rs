// Copyright (C) 2021 Scott Lamb <slamb@slamb.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Destinations for serialized text.

use std::io::Write;

use encoding_rs::{CoderResult, Encoder, Encoding, REPLACEMENT, UTF_16BE, UTF_16LE, UTF_8};
use log::debug;

use super::Error;

/// Size of the scratch buffer for transcoded bytes.
const ENCODE_BUF_LEN: usize = 4096;

/// A type-erased text destination, to avoid monomorphizing the serializer for
/// each `Write` impl.
pub(crate) trait Sink {
    fn write_str(&mut self, s: &str) -> Result<(), Error>;
}

impl Sink for String {
    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        self.push_str(s);
        Ok(())
    }
}

enum Transcoder {
    Utf8,

    /// Raw code units, preceded by a byte order mark on the first write.
    Utf16 { big_endian: bool, bom_written: bool },

    /// A single-byte charset whose code points match Unicode's up to `max`,
    /// such as US-ASCII or ISO-8859-1. Anything above is a character reference.
    Truncating { max: char },

    Other(Encoder),
}

/// Looks up labels that `encoding_rs` would map to a different charset than
/// the one the declaration names.
fn strict_transcoder(label: &str) -> Option<Transcoder> {
    let label = label.to_ascii_lowercase();
    match label.as_str() {
        "us-ascii" | "ascii" | "iso646-us" | "ansi_x3.4-1968" => {
            Some(Transcoder::Truncating { max: '\u{7f}' })
        }
        "iso-8859-1" | "iso_8859-1" | "iso8859-1" | "iso8859_1" | "8859_1" | "latin1"
        | "l1" => Some(Transcoder::Truncating { max: '\u{ff}' }),

        // Unmarked UTF-16 defaults to big-endian.
        "utf-16" => Some(Transcoder::Utf16 {
            big_endian: true,
            bom_written: false,
        }),
        _ => None,
    }
}

/// Writes text to a byte stream in the chosen encoding.
pub(crate) struct EncodingWriter<W: Write> {
    inner: W,
    transcoder: Transcoder,
    buf: Vec<u8>,
}

impl<W: Write> EncodingWriter<W> {
    /// Looks up `label`, failing if it's unknown.
    ///
    /// US-ASCII, ISO-8859-1 and plain UTF-16 are handled here. Other labels are
    /// WHATWG encoding labels such as `UTF-8` or `Shift_JIS`.
    pub(crate) fn new(inner: W, label: &str) -> Result<Self, Error> {
        let transcoder = match strict_transcoder(label.trim()) {
            Some(t) => {
                debug!("writing with label {:?}", label);
                t
            }
            None => {
                let encoding = match Encoding::for_label(label.trim().as_bytes()) {
                    Some(e) if e != REPLACEMENT => e,
                    _ => return Err(Error::unsupported_encoding(label)),
                };
                debug!("writing with encoding {} (label {:?})", encoding.name(), label);
                if encoding == UTF_8 {
                    Transcoder::Utf8
                } else if encoding == UTF_16BE || encoding == UTF_16LE {
                    Transcoder::Utf16 {
                        big_endian: encoding == UTF_16BE,
                        bom_written: false,
                    }
                } else {
                    Transcoder::Other(encoding.new_encoder())
                }
            }
        };
        Ok(Self {
            inner,
            transcoder,
            buf: Vec::new(),
        })
    }

    fn encode(&mut self, s: &str, last: bool) -> std::io::Result<()> {
        let Self {
            inner,
            transcoder,
            buf,
        } = self;
        match transcoder {
            Transcoder::Utf8 => inner.write_all(s.as_bytes()),
            Transcoder::Utf16 {
                big_endian,
                bom_written,
            } => {
                buf.clear();
                if !*bom_written {
                    let bom: &[u8] = if *big_endian { b"\xfe\xff" } else { b"\xff\xfe" };
                    buf.extend_from_slice(bom);
                    *bom_written = true;
                }
                for unit in s.encode_utf16() {
                    let bytes = if *big_endian {
                        unit.to_be_bytes()
                    } else {
                        unit.to_le_bytes()
                    };
                    buf.extend_from_slice(&bytes);
                }
                inner.write_all(&buf[..])
            }
            Transcoder::Truncating { max } => {
                if s.is_ascii() {
                    return inner.write_all(s.as_bytes());
                }
                buf.clear();
                for c in s.chars() {
                    if c <= *max {
                        buf.push(c as u8);
                    } else {
                        write!(buf, "&#{};", u32::from(c))?;
                    }
                }
                inner.write_all(&buf[..])
            }
            Transcoder::Other(encoder) => {
                buf.resize(ENCODE_BUF_LEN, 0);
                let mut src = s;
                loop {
                    let (result, read, written, replaced) =
                        encoder.encode_from_utf8(src, &mut buf[..], last);
                    if replaced {
                        debug!(
                            "{} can't represent some characters; wrote character references",
                            encoder.encoding().name()
                        );
                    }
                    inner.write_all(&buf[..written])?;
                    src = &src[read..];
                    match result {
                        CoderResult::InputEmpty => return Ok(()),
                        CoderResult::OutputFull => {}
                    }
                }
            }
        }
    }

    /// Finishes any pending encoder state and flushes the underlying writer.
    pub(crate) fn finish(mut self) -> Result<W, Error> {
        self.encode("", true)?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Sink for EncodingWriter<W> {
    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        Ok(self.encode(s, false)?)
    }
}
