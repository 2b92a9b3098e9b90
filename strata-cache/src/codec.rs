//! Result payload codec.
//!
//! Encodes a populated destination (a single record, an optional record, or
//! a collection) to bytes and back. The payload format is self-describing
//! JSON keyed by field name, so a destination type can grow fields without
//! invalidating every previously cached key; a payload that no longer fits
//! the destination type is a decode error, never a panic.
//!
//! The round-trip law is the codec's contract: for every supported
//! destination shape `decode(encode(x))` is observably equal to `x`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from payload encoding or decoding.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The destination could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// The payload could not be deserialized into the destination type.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Serialize a destination to payload bytes.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Deserialize payload bytes into a destination.
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(payload).map_err(|e| CodecError::Decode(e.to_string()))
}
