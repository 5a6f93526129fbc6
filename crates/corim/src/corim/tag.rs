use crate::types::decode_base64;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use corim_core::prelude::*;
use serde_cbor::Value as CborValue;
use serde_json::Value as JsonValue;
use std::fmt;

pub const COMID_TAG: u64 = 506;

///
/// ComidTag
///
/// A CoMID carried as its encoded binary form.
///

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ComidTag(pub Vec<u8>);

impl ComidTag {
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ComidTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&STANDARD.encode(&self.0))
    }
}

impl ChoiceValue for ComidTag {
    fn type_name(&self) -> &'static str {
        "comid"
    }

    fn tag(&self) -> u64 {
        COMID_TAG
    }

    fn validate(&self) -> Result<(), ChoiceError> {
        if self.0.is_empty() {
            return Err(ChoiceError::invalid("comid", "empty tag"));
        }

        Ok(())
    }

    fn bytes(&self) -> Vec<u8> {
        self.0.clone()
    }

    fn cbor_payload(&self) -> Result<CborValue, ChoiceError> {
        Ok(CborValue::Bytes(self.0.clone()))
    }

    fn json_value(&self) -> Result<JsonValue, ChoiceError> {
        Ok(JsonValue::String(self.to_string()))
    }
}

impl ParseVariant for ComidTag {
    fn from_text(text: &str) -> Result<Self, ChoiceError> {
        decode_base64("comid", text).map(Self)
    }

    fn from_cbor(payload: &CborValue) -> Result<Self, ChoiceError> {
        match payload {
            CborValue::Bytes(bytes) => Ok(Self(bytes.clone())),
            other => Err(ChoiceError::unexpected("comid", "byte string", other)),
        }
    }
}

corim_core::choice_family! {
    /// One tag of a CoRIM. CoSWID and CoTL payloads register as
    /// extension variants.
    pub enum ConciseTag = "concise tag" {
        Comid(ComidTag),
    }
}
