use corim_core::{codec::WireFormat, prelude::*};
use derive_more::{Deref, From};
use serde_cbor::Value as CborValue;
use serde_json::Value as JsonValue;
use std::fmt;

const TYPE_NAME: &str = "uuid";
pub const UUID_TAG: u64 = 37;

///
/// Uuid
///
/// RFC 4122 UUID. Sixteen raw bytes in the binary form, the hyphenated
/// 8-4-4-4-12 spelling in text. The nil UUID is the unset value.
///

#[derive(Clone, Copy, Debug, Default, Deref, Eq, From, Hash, Ord, PartialEq, PartialOrd)]
pub struct Uuid(uuid::Uuid);

impl Uuid {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(uuid::Uuid::from_bytes(bytes))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ChoiceError> {
        uuid::Uuid::from_slice(bytes).map(Self).map_err(|_| {
            ChoiceError::invalid(TYPE_NAME, format!("expected 16 bytes, got {}", bytes.len()))
        })
    }

    /// Parse the hyphenated form only.
    pub fn parse(text: &str) -> Result<Self, ChoiceError> {
        if text.len() != 36 {
            return Err(ChoiceError::invalid(
                TYPE_NAME,
                format!("{text:?} is not in 8-4-4-4-12 form"),
            ));
        }

        uuid::Uuid::try_parse(text)
            .map(Self)
            .map_err(|e| ChoiceError::invalid(TYPE_NAME, format!("{text:?}: {e}")))
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl ChoiceValue for Uuid {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn tag(&self) -> u64 {
        UUID_TAG
    }

    fn validate(&self) -> Result<(), ChoiceError> {
        if self.0.is_nil() {
            return Err(ChoiceError::invalid(TYPE_NAME, "empty UUID"));
        }

        Ok(())
    }

    fn bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn cbor_payload(&self) -> Result<CborValue, ChoiceError> {
        Ok(CborValue::Bytes(self.bytes()))
    }

    fn json_value(&self) -> Result<JsonValue, ChoiceError> {
        Ok(JsonValue::String(self.to_string()))
    }
}

// untagged field form
impl FieldValue for Uuid {
    fn encode<F: Format>(&self, _cx: &Context<'_>) -> Result<F::Value, CodecError> {
        match F::KIND {
            WireFormat::Cbor => Ok(F::bytes(self.as_bytes())),
            WireFormat::Json => F::to_value(&self.to_string()),
        }
    }

    fn decode<F: Format>(value: F::Value, _cx: &Context<'_>) -> Result<Self, CodecError> {
        let id = match F::KIND {
            WireFormat::Cbor => Self::from_slice(&F::to_bytes(value)?)?,
            WireFormat::Json => Self::parse(&F::from_value::<String>(value)?)?,
        };

        Ok(id)
    }
}

impl ParseVariant for Uuid {
    fn from_text(text: &str) -> Result<Self, ChoiceError> {
        Self::parse(text)
    }

    fn from_cbor(payload: &CborValue) -> Result<Self, ChoiceError> {
        match payload {
            CborValue::Bytes(bytes) => Self::from_slice(bytes),
            other => Err(ChoiceError::unexpected(TYPE_NAME, "byte string", other)),
        }
    }
}
