use crate::types::Uuid;
use corim_core::{codec::WireFormat, prelude::*};
use std::fmt;

///
/// TagId
///
/// Document identifier: free text or a UUID. Neither form is tagged;
/// the binary form tells them apart by major type (text vs 16 raw
/// bytes), the text form by whether the string spells a UUID. Text
/// that spells a UUID is therefore held as [`TagId::Uuid`].
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TagId {
    Text(String),
    Uuid(Uuid),
}

impl TagId {
    /// Text identifier, or a UUID when the text spells one.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Uuid::parse(&text).map_or(Self::Text(text), Self::Uuid)
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::Uuid(id) => !id.is_nil(),
        }
    }
}

impl From<&str> for TagId {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for TagId {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<Uuid> for TagId {
    fn from(id: Uuid) -> Self {
        Self::Uuid(id)
    }
}

impl Default for TagId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Uuid(id) => fmt::Display::fmt(id, f),
        }
    }
}

impl Validate for TagId {
    fn validate(&self) -> Result<(), ValidateError> {
        if !self.is_set() {
            return Err(ValidateError::invalid("empty tag ID"));
        }
        if matches!(self, Self::Text(text) if Uuid::parse(text).is_ok()) {
            return Err(ValidateError::invalid("text tag ID spells a UUID"));
        }

        Ok(())
    }
}

impl FieldValue for TagId {
    fn encode<F: Format>(&self, _cx: &Context<'_>) -> Result<F::Value, CodecError> {
        match (self, F::KIND) {
            (Self::Text(text), _) => F::to_value(text),
            (Self::Uuid(id), WireFormat::Cbor) => Ok(F::bytes(id.as_bytes())),
            (Self::Uuid(id), WireFormat::Json) => F::to_value(&id.to_string()),
        }
    }

    fn decode<F: Format>(value: F::Value, _cx: &Context<'_>) -> Result<Self, CodecError> {
        match F::KIND {
            WireFormat::Cbor => match F::to_bytes(value.clone()) {
                Ok(bytes) => Ok(Self::Uuid(Uuid::from_slice(&bytes)?)),
                Err(_) => F::from_value(value).map(Self::Text),
            },
            WireFormat::Json => {
                let text: String = F::from_value(value)?;
                Ok(Uuid::parse(&text).map_or(Self::Text(text), Self::Uuid))
            }
        }
    }

    fn is_empty(&self) -> bool {
        !self.is_set()
    }
}
