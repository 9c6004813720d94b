//! Response sanitizer and decoder.
//!
//! OpenBD occasionally emits raw control bytes inside otherwise valid JSON
//! strings, which strict parsers reject. The sanitizer strips them before
//! decoding.

use log::trace;
use serde_json::Value;

use crate::error::{Error, Result};

/// Decodes a raw response body into the first record of the provider's
/// top-level array.
///
/// `Ok(None)` means the provider does not know the ISBN (empty array, or a
/// null first element). Malformed JSON is an [`Error::Decode`].
pub fn decode(body: &str) -> Result<Option<Value>> {
    trace!("openbd::decode ({} bytes)", body.len());

    let cleaned = strip_control_characters(body);

    let parsed: Value = serde_json::from_str(&cleaned).map_err(Error::Decode)?;

    let first = match parsed.as_array() {
        Some(records) => records.first(),
        None => None,
    };

    match first {
        Some(record) if !record.is_null() => Ok(Some(record.clone())),
        _ => Ok(None),
    }
}

/// Removes every C0 control character and DEL (0x00-0x1F, 0x7F) verbatim.
/// No escaping: the bytes were never meant to be in the payload.
fn strip_control_characters(body: &str) -> String {
    body.chars()
        .filter(|c| !matches!(c, '\u{00}'..='\u{1f}' | '\u{7f}'))
        .collect()
}
