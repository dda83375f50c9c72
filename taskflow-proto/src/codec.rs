//! JSON encoding and decoding for request and response bodies.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error type for codec encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Encodes a body as JSON bytes.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the value cannot be serialized.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(value).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes a response body into an untyped JSON value.
///
/// An empty (or whitespace-only) body decodes as `null`, so `204`-style
/// replies are not mistaken for malformed payloads.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the bytes are not valid JSON.
pub fn decode_value(bytes: &[u8]) -> Result<serde_json::Value, CodecError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Converts an already-parsed JSON value into a typed body.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the value does not have the
/// expected shape.
pub fn from_value<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, CodecError> {
    serde_json::from_value(value).map_err(|e| CodecError::Serialization(e.to_string()))
}
