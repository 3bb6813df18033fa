//! Charset detection and transcoding of saved result pages.
//!
//! Pages saved from the marketplace are frequently `windows-1251`. The
//! charset is taken from a byte-order mark, then from the first `<meta>`
//! declaration in the head; UTF-8 is assumed otherwise.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Bytes scanned for a charset declaration.
const SNIFF_LIMIT: usize = 2048;

/// `<meta charset=...>` or `<meta http-equiv=Content-Type content="...; charset=...">`.
#[allow(clippy::expect_used)]
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?\bcharset\s*=\s*["']?([A-Za-z0-9_.:-]+)"#).expect("META_CHARSET_RE regex")
});

/// Detect the page charset.
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LIMIT)]);
    META_CHARSET_RE
        .captures(&head)
        .and_then(|caps| caps.get(1))
        .and_then(|label| Encoding::for_label(label.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode page bytes to UTF-8 text.
///
/// Undecodable sequences become U+FFFD; a byte-order mark is removed.
///
/// # Examples
///
/// ```
/// use serp_offers::encoding::transcode_to_utf8;
///
/// let page = b"<html><head><meta charset=\"windows-1251\"></head><body>\xd6\xe5\xed\xe0</body></html>";
/// assert!(transcode_to_utf8(page).contains("Цена"));
/// ```
#[must_use]
pub fn transcode_to_utf8(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes);
    let (text, used, had_errors) = encoding.decode(bytes);
    if used != UTF_8 || had_errors {
        tracing::debug!(encoding = used.name(), had_errors, "transcoded page");
    }
    text.into_owned()
}
