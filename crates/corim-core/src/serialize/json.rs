use crate::serialize::{SerializeError, check_size, strict::KeyScan};
use serde::Deserialize;
use serde_json::{Deserializer, Value};

/// Serialize a value tree into JSON bytes.
pub(super) fn serialize(value: &Value, pretty: bool) -> Result<Vec<u8>, SerializeError> {
    let out = if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    };

    out.map_err(|e| SerializeError::Serialize(e.to_string()))
}

/// Deserialize JSON bytes into a value tree.
pub(super) fn deserialize_bounded(bytes: &[u8], max_bytes: usize) -> Result<Value, SerializeError> {
    check_size(bytes.len(), max_bytes)?;

    let mut de = Deserializer::from_slice(bytes);
    let report =
        KeyScan::deserialize(&mut de).map_err(|err| SerializeError::Deserialize(err.to_string()))?;
    de.end()
        .map_err(|err| SerializeError::Deserialize(err.to_string()))?;
    report.into_result()?;

    serde_json::from_slice(bytes).map_err(|err| SerializeError::Deserialize(err.to_string()))
}
