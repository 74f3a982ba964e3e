//! Charset detection for byte-buffer inputs.
//!
//! The fetch layer may hand over raw bytes; this module sniffs the charset
//! declaration from the document head and decodes to UTF-8 before parsing.
//! Decoding is lossy: undecodable bytes become U+FFFD instead of failing
//! the request.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Only this many leading bytes are examined for a charset declaration.
const SNIFF_WINDOW: usize = 2048;

#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s;>]+)"#).expect("META_CHARSET regex")
});

/// Charset declared in the document head, if any label is recognized.
#[must_use]
pub fn sniff_charset(html: &[u8]) -> Option<&'static Encoding> {
    let head = &html[..html.len().min(SNIFF_WINDOW)];
    let head_str = String::from_utf8_lossy(head);
    let label = META_CHARSET.captures(&head_str)?.get(1)?.as_str();
    Encoding::for_label(label.as_bytes())
}

/// Decode HTML bytes to a UTF-8 string, honoring a declared charset and
/// defaulting to UTF-8.
#[must_use]
pub fn decode_html(html: &[u8]) -> String {
    let encoding = sniff_charset(html).unwrap_or(UTF_8);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }
    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}
