use corim_core::prelude::*;
use derive_more::{Display, From};
use serde_cbor::Value as CborValue;
use serde_json::Value as JsonValue;

const TYPE_NAME: &str = "int";
pub const TAGGED_INT_TAG: u64 = 551;

///
/// TaggedInt
///
/// Signed integer identifier. The canonical byte form is eight bytes,
/// big endian. Text accepts a decimal string or a bare number.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd)]
pub struct TaggedInt(pub i64);

impl ChoiceValue for TaggedInt {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn tag(&self) -> u64 {
        TAGGED_INT_TAG
    }

    fn bytes(&self) -> Vec<u8> {
        self.0.to_be_bytes().to_vec()
    }

    fn cbor_payload(&self) -> Result<CborValue, ChoiceError> {
        Ok(CborValue::Integer(i128::from(self.0)))
    }

    fn json_value(&self) -> Result<JsonValue, ChoiceError> {
        Ok(JsonValue::String(self.0.to_string()))
    }
}

impl ParseVariant for TaggedInt {
    fn from_text(text: &str) -> Result<Self, ChoiceError> {
        text.parse()
            .map(Self)
            .map_err(|e| ChoiceError::invalid(TYPE_NAME, format!("{text:?}: {e}")))
    }

    fn from_cbor(payload: &CborValue) -> Result<Self, ChoiceError> {
        match payload {
            CborValue::Integer(i) => i64::try_from(*i)
                .map(Self)
                .map_err(|_| ChoiceError::invalid(TYPE_NAME, format!("{i} out of range"))),
            // eight-byte big-endian form
            CborValue::Bytes(bytes) => <[u8; 8]>::try_from(bytes.as_slice())
                .map(|b| Self(i64::from_be_bytes(b)))
                .map_err(|_| ChoiceError::invalid(TYPE_NAME, format!("expected 8 bytes, got {}", bytes.len()))),
            other => Err(ChoiceError::unexpected(TYPE_NAME, "integer", other)),
        }
    }

    fn from_json(value: &JsonValue) -> Result<Self, ChoiceError> {
        match value {
            JsonValue::String(text) => Self::from_text(text),
            JsonValue::Number(n) => n
                .as_i64()
                .map(Self)
                .ok_or_else(|| ChoiceError::invalid(TYPE_NAME, format!("{n} is not a 64-bit integer"))),
            other => Err(ChoiceError::unexpected(TYPE_NAME, "decimal string", other)),
        }
    }
}
