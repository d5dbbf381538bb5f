//! Tolerant text handling for URL paths and file names
//!
//! Everything here works on raw bytes, so names that are not valid UTF-8
//! survive decoding, escaping and re-encoding unchanged.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};

/// Charset announced for generated pages
pub const PAGE_CHARSET: &str = "utf-8";

/// Percent-decode into raw bytes.
///
/// Never fails: malformed escapes such as `%zz` or a trailing `%` are kept
/// literally, and decoded bytes are not required to form valid UTF-8.
pub fn decode_tolerant(input: &str) -> Vec<u8> {
    urlencoding::decode_binary(input.as_bytes()).into_owned()
}

/// Percent-encode raw bytes for use inside an `href`.
///
/// Unreserved characters (`A-Z a-z 0-9 - _ . ~`) stay as they are.
pub fn encode_tolerant(bytes: &[u8]) -> Cow<'_, str> {
    urlencoding::encode_binary(bytes)
}

/// Escape bytes for embedding as HTML text.
///
/// Only ASCII markup characters are rewritten; every other byte is copied.
pub fn escape_html(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'&' => out.extend_from_slice(b"&amp;"),
            b'<' => out.extend_from_slice(b"&lt;"),
            b'>' => out.extend_from_slice(b"&gt;"),
            b'"' => out.extend_from_slice(b"&quot;"),
            b'\'' => out.extend_from_slice(b"&#x27;"),
            _ => out.push(b),
        }
    }
    out
}

/// Raw bytes of a file name as the OS reports it
#[cfg(unix)]
pub fn os_to_bytes(name: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(name.as_bytes())
}

#[cfg(not(unix))]
pub fn os_to_bytes(name: &OsStr) -> Cow<'_, [u8]> {
    match name.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

/// Build an OS string from decoded bytes
#[cfg(unix)]
pub fn bytes_to_os(bytes: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes)
}

#[cfg(not(unix))]
pub fn bytes_to_os(bytes: Vec<u8>) -> OsString {
    OsString::from(String::from_utf8_lossy(&bytes).into_owned())
}
