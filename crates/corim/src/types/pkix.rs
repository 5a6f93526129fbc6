//! PEM-armoured key and certificate variants. Only the armour is
//! checked; the DER inside is never parsed.

use crate::types::bytes::decode_base64;
use corim_core::prelude::*;
use serde_cbor::Value as CborValue;
use serde_json::Value as JsonValue;
use std::fmt;

pub const PKIX_KEY_TAG: u64 = 554;
pub const PKIX_CERT_TAG: u64 = 555;
pub const PKIX_CERT_PATH_TAG: u64 = 556;

/// Count the PEM blocks labelled `label` in `text`, rejecting anything
/// that is not a well-formed block.
fn pem_blocks(type_name: &'static str, text: &str, label: &str) -> Result<usize, ChoiceError> {
    let begin = format!("-----BEGIN {label}-----");
    let end = format!("-----END {label}-----");

    let mut blocks = 0;
    let mut body: Option<String> = None;
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match body.as_mut() {
            None if line == begin => body = Some(String::new()),
            None => {
                return Err(ChoiceError::invalid(
                    type_name,
                    format!("expected {begin:?}, found {line:?}"),
                ));
            }
            Some(collected) if line == end => {
                if collected.is_empty() {
                    return Err(ChoiceError::invalid(type_name, "empty PEM block"));
                }
                decode_base64(type_name, collected)?;
                blocks += 1;
                body = None;
            }
            Some(collected) => collected.push_str(line),
        }
    }

    if body.is_some() {
        return Err(ChoiceError::invalid(type_name, format!("missing {end:?}")));
    }
    if blocks == 0 {
        return Err(ChoiceError::invalid(type_name, "no PEM block"));
    }

    Ok(blocks)
}

macro_rules! pem_variant {
    (
        $(#[$meta:meta])*
        $name:ident, $type_name:literal, $tag:expr, $label:literal, $single:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(pem: impl Into<String>) -> Result<Self, ChoiceError> {
                let value = Self(pem.into());
                value.validate()?;

                Ok(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
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
                let blocks = pem_blocks($type_name, &self.0, $label)?;
                if $single && blocks > 1 {
                    return Err(ChoiceError::invalid(
                        $type_name,
                        format!("expected one PEM block, found {blocks}"),
                    ));
                }

                Ok(())
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

        impl ParseVariant for $name {
            fn from_text(text: &str) -> Result<Self, ChoiceError> {
                Ok(Self(text.to_string()))
            }

            fn from_cbor(payload: &CborValue) -> Result<Self, ChoiceError> {
                match payload {
                    CborValue::Text(text) => Ok(Self(text.clone())),
                    other => Err(ChoiceError::unexpected($type_name, "text string", other)),
                }
            }
        }
    };
}

pem_variant! {
    /// SubjectPublicKeyInfo in PEM.
    PkixKey, "pkix-base64-key", PKIX_KEY_TAG, "PUBLIC KEY", true
}

pem_variant! {
    /// X.509 certificate in PEM.
    PkixCert, "pkix-base64-cert", PKIX_CERT_TAG, "CERTIFICATE", true
}

pem_variant! {
    /// Chain of X.509 certificates in PEM, leaf first.
    PkixCertPath, "pkix-base64-cert-path", PKIX_CERT_PATH_TAG, "CERTIFICATE", false
}
