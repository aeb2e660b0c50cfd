use crate::serialize::SerializeError;
use serde::{Serialize, de::DeserializeOwned};
use serde_cbor::{Deserializer, to_vec};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Serialize a value into CBOR bytes.
pub(super) fn serialize<T>(t: &T) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    to_vec(t).map_err(|e| SerializeError::Serialize(e.to_string()))
}

/// Deserialize the first CBOR item of `bytes`, reporting its encoded length.
pub(super) fn deserialize_prefix<T>(
    bytes: &[u8],
    max_bytes: usize,
) -> Result<(T, usize), SerializeError>
where
    T: DeserializeOwned,
{
    let window = &bytes[..bytes.len().min(max_bytes)];

    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut de = Deserializer::from_slice(window);
        let item = T::deserialize(&mut de);
        (item, de.byte_offset())
    }));

    match result {
        Ok((Ok(value), consumed)) => Ok((value, consumed)),
        Ok((Err(err), _)) if window.len() < bytes.len() && err.is_eof() => {
            Err(SerializeError::DeserializeSizeLimitExceeded {
                len: bytes.len(),
                max_bytes,
            })
        }
        Ok((Err(err), _)) => Err(SerializeError::Deserialize(err.to_string())),
        Err(_) => Err(SerializeError::Deserialize(
            "panic during CBOR deserialization".into(),
        )),
    }
}

///
/// TESTS
///
