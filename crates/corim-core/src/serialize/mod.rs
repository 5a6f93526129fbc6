mod cbor;
mod json;
mod strict;


use serde_cbor::Value as CborValue;
use serde_json::Value as JsonValue;
use std::fmt;
use thiserror::Error as ThisError;

/// Generic wire serialization infrastructure.
///
/// This module is format-level only:
/// - It turns fully materialized bytes into raw value trees and back.
/// - No entity schema or field policy is known here.
/// - Callers that need bounded decode must pass explicit limits.
/// - Schema-aware wrappers belong in `crate::codec`.

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),

    #[error("deserialize size limit exceeded: {len} bytes (limit {max_bytes})")]
    DeserializeSizeLimitExceeded { len: usize, max_bytes: usize },

    #[error("duplicate map key {key}")]
    DuplicateKey { key: String },
}

///
/// SerializeErrorKind
///
/// Stable error-kind taxonomy for serializer failures.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SerializeErrorKind {
    Serialize,
    Deserialize,
    DeserializeSizeLimitExceeded,
    DuplicateKey,
}

impl SerializeErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serialize => "serialize",
            Self::Deserialize => "deserialize",
            Self::DeserializeSizeLimitExceeded => "deserialize_size_limit_exceeded",
            Self::DuplicateKey => "duplicate_key",
        }
    }
}

impl fmt::Display for SerializeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SerializeError {
    /// Return a stable error kind independent of backend error-message text.
    #[must_use]
    pub const fn kind(&self) -> SerializeErrorKind {
        match self {
            Self::Serialize(_) => SerializeErrorKind::Serialize,
            Self::Deserialize(_) => SerializeErrorKind::Deserialize,
            Self::DeserializeSizeLimitExceeded { .. } => {
                SerializeErrorKind::DeserializeSizeLimitExceeded
            }
            Self::DuplicateKey { .. } => SerializeErrorKind::DuplicateKey,
        }
    }
}

/// Serialize a raw CBOR value tree into bytes.
pub fn to_cbor(value: &CborValue) -> Result<Vec<u8>, SerializeError> {
    cbor::serialize(value)
}

/// Deserialize CBOR bytes into a raw value tree, with an explicit size limit.
///
/// Duplicate map keys at any nesting level are rejected.
pub fn from_cbor_bounded(bytes: &[u8], max_bytes: usize) -> Result<CborValue, SerializeError> {
    cbor::deserialize_bounded(bytes, max_bytes)
}

/// Serialize a raw JSON value tree into bytes.
pub fn to_json(value: &JsonValue, pretty: bool) -> Result<Vec<u8>, SerializeError> {
    json::serialize(value, pretty)
}

/// Deserialize JSON bytes into a raw value tree, with an explicit size limit.
///
/// Duplicate object members at any nesting level are rejected.
pub fn from_json_bounded(bytes: &[u8], max_bytes: usize) -> Result<JsonValue, SerializeError> {
    json::deserialize_bounded(bytes, max_bytes)
}

// Size limits are caller policy, not serialization-format policy.
fn check_size(len: usize, max_bytes: usize) -> Result<(), SerializeError> {
    if len > max_bytes {
        return Err(SerializeError::DeserializeSizeLimitExceeded { len, max_bytes });
    }

    Ok(())
}
