use crate::types::{Oid, check_absolute_uri};
use corim_core::prelude::*;
use serde_cbor::Value as CborValue;
use serde_json::Value as JsonValue;
use std::fmt;

pub const URI_TAG: u64 = 32;

///
/// Uri
///
/// Absolute URI. Only the scheme is checked.
///

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Uri(pub String);

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ChoiceValue for Uri {
    fn type_name(&self) -> &'static str {
        "uri"
    }

    fn tag(&self) -> u64 {
        URI_TAG
    }

    fn validate(&self) -> Result<(), ChoiceError> {
        check_absolute_uri(&self.0).map_err(|e| ChoiceError::invalid("uri", e.to_string()))
    }

    fn bytes(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }

    fn cbor_payload(&self) -> Result<CborValue, ChoiceError> {
        Ok(CborValue::Text(self.0.clone()))
    }

    fn json_value(&self) -> Result<JsonValue, ChoiceError> {
        Ok(JsonValue::String(self.0.clone()))
    }
}

impl ParseVariant for Uri {
    fn from_text(text: &str) -> Result<Self, ChoiceError> {
        Ok(Self(text.to_string()))
    }

    fn from_cbor(payload: &CborValue) -> Result<Self, ChoiceError> {
        match payload {
            CborValue::Text(text) => Ok(Self(text.clone())),
            other => Err(ChoiceError::unexpected("uri", "text string", other)),
        }
    }
}

corim_core::choice_family! {
    /// Names the profile a document follows.
    pub enum ProfileId = "profile" {
        Uri(Uri),
        Oid(Oid),
    }
}

impl ProfileId {
    pub fn uri(uri: impl Into<String>) -> Result<Self, ChoiceError> {
        let uri = Uri(uri.into());
        uri.validate()?;

        Ok(Self::Uri(uri))
    }

    pub fn oid(dotted: &str) -> Result<Self, ChoiceError> {
        dotted.parse().map(Self::Oid)
    }
}
