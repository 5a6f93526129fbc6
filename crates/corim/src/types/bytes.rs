//! Variants whose payload is a byte string: base64 in text, a CBOR byte
//! string in binary.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use corim_core::prelude::*;
use serde_cbor::Value as CborValue;
use serde_json::Value as JsonValue;
use std::fmt;

pub const UEID_TAG: u64 = 550;
pub const TAGGED_BYTES_TAG: u64 = 560;
pub const IMPL_ID_TAG: u64 = 600;
pub const COSE_KEY_TAG: u64 = 558;

pub(crate) fn decode_base64(type_name: &'static str, text: &str) -> Result<Vec<u8>, ChoiceError> {
    STANDARD
        .decode(text)
        .map_err(|e| ChoiceError::invalid(type_name, format!("bad base64: {e}")))
}

macro_rules! bytes_variant {
    (
        $(#[$meta:meta])*
        $name:ident, $type_name:literal, $tag:expr, |$len:ident| $check:expr
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub struct $name(pub Vec<u8>);

        impl $name {
            pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ChoiceError> {
                let value = Self(bytes.into());
                value.validate()?;

                Ok(value)
            }

            #[must_use]
            pub fn as_slice(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&STANDARD.encode(&self.0))
            }
        }

        impl ChoiceValue for $name {
            fn type_name(&self) -> &'static str {
                $type_name
            }

            fn tag(&self) -> u64 {
                $tag
            }

            fn validate(&self) -> Result<(), ChoiceError> {
                let $len = self.0.len();
                match $check {
                    Some(reason) => Err(ChoiceError::invalid($type_name, reason)),
                    None => Ok(()),
                }
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

        // untagged field form
        impl FieldValue for $name {
            fn encode<F: Format>(&self, _cx: &Context<'_>) -> Result<F::Value, CodecError> {
                Ok(F::bytes(&self.0))
            }

            fn decode<F: Format>(value: F::Value, _cx: &Context<'_>) -> Result<Self, CodecError> {
                F::to_bytes(value).map(Self)
            }
        }

        impl ParseVariant for $name {
            fn from_text(text: &str) -> Result<Self, ChoiceError> {
                decode_base64($type_name, text).map(Self)
            }

            fn from_cbor(payload: &CborValue) -> Result<Self, ChoiceError> {
                match payload {
                    CborValue::Bytes(bytes) => Ok(Self(bytes.clone())),
                    other => Err(ChoiceError::unexpected($type_name, "byte string", other)),
                }
            }
        }
    };
}

bytes_variant! {
    /// Universal Entity ID.
    Ueid, "ueid", UEID_TAG, |len| {
        (!(7..=33).contains(&len))
            .then(|| format!("length must be between 7 and 33 bytes, got {len}"))
    }
}

bytes_variant! {
    /// Opaque tagged byte string.
    TaggedBytes, "bytes", TAGGED_BYTES_TAG, |len| (len == 0).then(|| "empty bytes".to_string())
}

bytes_variant! {
    /// PSA implementation ID.
    ImplId, "psa.impl-id", IMPL_ID_TAG, |len| {
        (len != 32).then(|| format!("expected 32 bytes, got {len}"))
    }
}

bytes_variant! {
    /// Serialized COSE_Key. Not parsed.
    CoseKey, "cose-key", COSE_KEY_TAG, |len| (len == 0).then(|| "empty COSE key".to_string())
}
