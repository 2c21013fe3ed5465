//! JSON decoding helpers for API payloads.

use serde_json::{Map, Value};

use crate::error::{WebflowError, WebflowResult};

/// Decode a response body, attributing failures to the URL that produced it
pub fn decode_json(url: &str, text: &str) -> WebflowResult<Value> {
    serde_json::from_str(text).map_err(|source| WebflowError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Take the array stored under `key`, or an empty slice when the key is
/// missing or holds something other than an array
pub fn array_field<'a>(object: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
