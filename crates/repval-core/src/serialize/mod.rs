mod buffer;
mod cbor;

use crate::error::InternalError;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error as ThisError;

// re-exports
pub use buffer::{
    DEFAULT_MAX_STRING_BYTES, DEFAULT_MAX_VALUE_BYTES, DecodeLimits, ReadBuffer, WriteBuffer,
};

/// Generic value serialization infrastructure.
///
/// This module is format-level only: the byte-exact aggregate state layouts
/// live with the slots that own them, on top of [`WriteBuffer`] and
/// [`ReadBuffer`].

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
}

impl From<SerializeError> for InternalError {
    fn from(err: SerializeError) -> Self {
        match err {
            SerializeError::Serialize(_) => Self::serialize_internal(err.to_string()),
            SerializeError::Deserialize(_) | SerializeError::DeserializeSizeLimitExceeded { .. } => {
                Self::serialize_corruption(err.to_string())
            }
        }
    }
}

/// Serialize a value using the default CBOR serializer.
pub fn serialize<T>(ty: &T) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    cbor::serialize(ty)
}

/// Deserialize one value from the front of `bytes`.
///
/// Returns the value and the number of bytes it occupied, so callers can keep
/// reading a stream of concatenated payloads. At most `max_bytes` are scanned.
pub fn deserialize_prefix<T>(bytes: &[u8], max_bytes: usize) -> Result<(T, usize), SerializeError>
where
    T: DeserializeOwned,
{
    cbor::deserialize_prefix(bytes, max_bytes)
}
