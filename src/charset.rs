//! Charset resolution and transcoding
//!
//! Bodies are exchanged with the codec as UTF-8. Any other charset named in a
//! `Content-Type` header is transcoded with `encoding_rs`, except ISO-8859-1,
//! which keeps its strict byte-to-code-point mapping rather than the WHATWG
//! `windows-1252` alias.

use std::borrow::Cow;
use std::fmt;

use encoding_rs::{Encoding, REPLACEMENT, UTF_16BE, UTF_16LE, UTF_8};
use http::header::CONTENT_TYPE;
use http::HeaderMap;

use crate::errors::{ConverterError, Direction, Result};
use crate::media_type::MediaType;

/// Charset used whenever a message does not name one
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// IANA aliases of ISO-8859-1
const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso_8859-1:1987",
    "iso88591",
    "latin1",
    "l1",
    "iso-ir-100",
    "ibm819",
    "cp819",
    "csisolatin1",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Latin1,
    Whatwg(&'static Encoding),
}

/// A character encoding resolved from a charset label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    kind: Kind,
}

impl Charset {
    /// The default UTF-8 charset
    pub fn utf8() -> Self {
        Self { kind: Kind::Whatwg(UTF_8) }
    }

    /// ISO-8859-1: byte N is code point U+00NN
    pub fn latin1() -> Self {
        Self { kind: Kind::Latin1 }
    }

    /// Look up a charset by label (`"ISO-8859-1"`, `"utf-8"`, `"Shift_JIS"`, ...)
    ///
    /// Labels other than ISO-8859-1 follow the WHATWG Encoding Standard.
    /// Labels mapped to its `replacement` encoding cannot round-trip and
    /// yield `None`.
    pub fn for_label(label: &str) -> Option<Self> {
        let label = label.trim().trim_matches('"');
        if LATIN1_LABELS.iter().any(|l| l.eq_ignore_ascii_case(label)) {
            return Some(Self::latin1());
        }
        Encoding::for_label(label.as_bytes())
            .filter(|encoding| *encoding != REPLACEMENT)
            .map(|encoding| Self { kind: Kind::Whatwg(encoding) })
    }

    /// The underlying `encoding_rs` encoding, `None` for ISO-8859-1
    pub fn encoding(&self) -> Option<&'static Encoding> {
        match self.kind {
            Kind::Latin1 => None,
            Kind::Whatwg(encoding) => Some(encoding),
        }
    }

    /// Canonical name of the charset
    pub fn name(&self) -> &'static str {
        match self.kind {
            Kind::Latin1 => "ISO-8859-1",
            Kind::Whatwg(encoding) => encoding.name(),
        }
    }

    pub fn is_utf8(&self) -> bool {
        self.kind == Kind::Whatwg(UTF_8)
    }

    /// Decode raw bytes into text. Malformed sequences become U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self.kind {
            Kind::Latin1 => encoding_rs::mem::decode_latin1(bytes).into_owned(),
            Kind::Whatwg(encoding) => {
                let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
                if had_errors {
                    tracing::debug!(charset = self.name(), "replaced malformed input sequences");
                }
                text.into_owned()
            }
        }
    }

    /// Whether `c` has a representation in this charset
    pub fn can_encode(&self, c: char) -> bool {
        match self.kind {
            _ if c.is_ascii() => true,
            Kind::Latin1 => u32::from(c) <= 0xFF,
            Kind::Whatwg(encoding) if encoding == UTF_8 || encoding == UTF_16LE || encoding == UTF_16BE => true,
            Kind::Whatwg(encoding) => {
                let mut buf = [0u8; 4];
                let (_, _, had_errors) = encoding.encode(c.encode_utf8(&mut buf));
                !had_errors
            }
        }
    }

    /// Encode JSON text into this charset
    ///
    /// Characters the charset cannot represent can only occur inside JSON
    /// string literals, so they are written as `\uXXXX` escapes and decode
    /// back to the same value.
    pub fn encode_json(&self, text: &str) -> Vec<u8> {
        let text = self.escape_unmappable(text);
        match self.kind {
            Kind::Latin1 => text.chars().map(|c| c as u8).collect(),
            // encoding_rs only encodes UTF-16 as UTF-8, so those two are handled here
            Kind::Whatwg(encoding) if encoding == UTF_16LE => {
                text.encode_utf16().flat_map(u16::to_le_bytes).collect()
            }
            Kind::Whatwg(encoding) if encoding == UTF_16BE => {
                text.encode_utf16().flat_map(u16::to_be_bytes).collect()
            }
            Kind::Whatwg(encoding) => encoding.encode(&text).0.into_owned(),
        }
    }

    fn escape_unmappable<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.chars().all(|c| self.can_encode(c)) {
            return Cow::Borrowed(text);
        }
        let mut escaped = String::with_capacity(text.len() + 16);
        let mut units = [0u16; 2];
        for c in text.chars() {
            if self.can_encode(c) {
                escaped.push(c);
            } else {
                for unit in c.encode_utf16(&mut units) {
                    escaped.push_str(&format!("\\u{:04x}", unit));
                }
            }
        }
        tracing::debug!(charset = self.name(), "unmappable characters written as JSON escapes");
        Cow::Owned(escaped)
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::utf8()
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read the `Content-Type` header, if any, as a media type
pub fn content_type(headers: &HeaderMap) -> Result<Option<MediaType>> {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|e| {
        ConverterError::invalid_media_type(String::from_utf8_lossy(value.as_bytes()), e.to_string())
    })?;
    MediaType::parse(value).map(Some)
}

/// Resolve the charset of a message from its `Content-Type` header
///
/// Falls back to [`DEFAULT_CHARSET`] when the header or its `charset`
/// parameter is missing. `direction` tells whose header named an unknown
/// charset.
pub fn resolve(headers: &HeaderMap, direction: Direction) -> Result<Charset> {
    match content_type(headers)?.as_ref().and_then(MediaType::charset) {
        Some(label) => {
            Charset::for_label(label).ok_or_else(|| ConverterError::unsupported_charset(label, direction))
        }
        None => Ok(Charset::utf8()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::SHIFT_JIS;
    use http::HeaderValue;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_resolve_without_header() {
        assert_eq!(resolve(&HeaderMap::new(), Direction::Read).unwrap(), Charset::utf8());
    }

    #[test]
    fn test_resolve_without_charset_param() {
        let charset = resolve(&headers("application/yagson"), Direction::Read).unwrap();
        assert!(charset.is_utf8());
    }

    #[test]
    fn test_resolve_explicit_charset() {
        let charset = resolve(&headers("application/yagson; charset=ISO-8859-1"), Direction::Read).unwrap();
        assert_eq!(charset, Charset::latin1());
        assert_eq!(charset.name(), "ISO-8859-1");
        assert!(!charset.is_utf8());
    }

    #[test]
    fn test_resolve_unknown_charset() {
        let err = resolve(&headers("application/json; charset=klingon"), Direction::Write).unwrap_err();
        assert!(matches!(
            err,
            ConverterError::UnsupportedCharset { ref label, direction: Direction::Write } if label == "klingon"
        ));
    }

    #[test]
    fn test_replacement_labels_rejected() {
        assert_eq!(Charset::for_label("iso-2022-kr"), None);
        assert_eq!(Charset::for_label("csiso2022kr"), None);
        assert!(Charset::for_label("Shift_JIS").is_some());
    }

    #[test]
    fn test_latin1_maps_bytes_to_code_points() {
        let charset = Charset::for_label("latin1").unwrap();
        assert_eq!(charset.decode(&[b'"', 0x80, 0x9F, 0xE9, b'"']), "\"\u{80}\u{9f}\u{e9}\"");
        assert_eq!(charset.encode_json("\"caf\u{e9}\u{85}\""), vec![b'"', b'c', b'a', b'f', 0xE9, 0x85, b'"']);
    }

    #[test]
    fn test_unmappable_written_as_json_escapes() {
        let latin1 = Charset::latin1();
        assert_eq!(latin1.encode_json("\"\u{4e2d}\u{20ac}\""), b"\"\\u4e2d\\u20ac\"".to_vec());
        assert_eq!(latin1.encode_json("\"\u{1f980}\""), b"\"\\ud83e\\udd80\"".to_vec());

        let sjis = Charset::for_label("shift_jis").unwrap();
        assert_eq!(sjis.encoding(), Some(SHIFT_JIS));
        let bytes = sjis.encode_json("\"\u{4e2d}\u{e9}\"");
        assert_eq!(sjis.decode(&bytes), "\"\u{4e2d}\\u00e9\"");
    }

    #[test]
    fn test_utf16_encodes_code_units() {
        let charset = Charset::for_label("utf-16be").unwrap();
        assert_eq!(charset.encode_json("A"), vec![0x00, 0x41]);
    }
}
