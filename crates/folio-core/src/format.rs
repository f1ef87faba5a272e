//! Textual formats for timestamps and binary payloads.
//!
//! Timestamps are written in RFC 1123 form, always in UTC
//! (`Sun, 06 Nov 1994 08:49:37 GMT`). The format has whole-second
//! precision, so sub-second parts are truncated on output.
//!
//! Binary payloads use standard base64 with padding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

use crate::error::{EntityError, Result};

const RFC1123: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Formats an instant as RFC 1123 text in UTC.
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.format(RFC1123).to_string()
}

/// Parses RFC 1123 text written by [`format_instant`].
pub fn parse_instant(name: &str, text: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text.trim(), RFC1123)
        .map(|naive| naive.and_utc())
        .map_err(|e| EntityError::invalid(name, format!("{text:?} is not an RFC 1123 timestamp: {e}")))
}

/// Drops the sub-second part of an instant, matching what survives
/// [`format_instant`].
pub fn truncate_instant(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.with_nanosecond(0).unwrap_or(instant)
}

/// The current instant, already truncated to whole seconds.
pub fn now() -> DateTime<Utc> {
    truncate_instant(Utc::now())
}

/// Encodes bytes as base64 text.
pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes base64 text written by [`encode_bytes`].
pub fn decode_bytes(name: &str, text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| EntityError::invalid(name, format!("not valid base64: {e}")))
}
