//! Strict percent-encoding (RFC 3986 unreserved set).

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, percent_encode};

/// OAuth unreserved characters: A-Z a-z 0-9 - . _ ~
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode string per RFC 3986.
///
/// Every byte outside `[A-Za-z0-9-._~]` is escaped, including `/`, `:` and
/// `+`. Multi-byte UTF-8 characters are escaped byte by byte.
pub fn oauth_encode(input: &str) -> String {
    percent_encode(input.as_bytes(), OAUTH_ENCODE_SET).to_string()
}

/// Decode a percent-encoded string.
///
/// Invalid UTF-8 sequences after decoding are replaced with U+FFFD.
pub fn oauth_decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}
