use crate::serialize::{SerializeError, check_size, strict::KeyScan};
use serde::Deserialize;
use serde_cbor::{Deserializer, Value, from_slice, to_vec};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Serialize a value tree into CBOR bytes.
pub(super) fn serialize(value: &Value) -> Result<Vec<u8>, SerializeError> {
    to_vec(value).map_err(|e| SerializeError::Serialize(e.to_string()))
}

/// Deserialize CBOR bytes into a value tree.
///
/// Safety guarantees:
/// - Input size is bounded before decode.
/// - Duplicate map keys are rejected before the tree is built.
/// - Any panic during decode is caught and reported as a deserialize error.
pub(super) fn deserialize_bounded(bytes: &[u8], max_bytes: usize) -> Result<Value, SerializeError> {
    check_size(bytes.len(), max_bytes)?;

    let result = catch_unwind(AssertUnwindSafe(|| {
        scan(bytes)?;
        from_slice::<Value>(bytes).map_err(|err| SerializeError::Deserialize(err.to_string()))
    }));

    match result {
        Ok(outcome) => outcome,
        Err(_) => Err(SerializeError::Deserialize(
            "panic during CBOR deserialization".into(),
        )),
    }
}

fn scan(bytes: &[u8]) -> Result<(), SerializeError> {
    let mut de = Deserializer::from_slice(bytes);
    let report =
        KeyScan::deserialize(&mut de).map_err(|err| SerializeError::Deserialize(err.to_string()))?;
    de.end()
        .map_err(|err| SerializeError::Deserialize(err.to_string()))?;

    report.into_result()
}
