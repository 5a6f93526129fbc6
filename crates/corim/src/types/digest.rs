use crate::types::bytes::decode_base64;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use corim_core::{codec::WireFormat, prelude::*};
use serde_cbor::Value as CborValue;
use serde_json::Value as JsonValue;
use std::{fmt, str::FromStr};

pub const THUMBPRINT_TAG: u64 = 557;

///
/// HashAlg
///
/// Named Information hash algorithm registry entries.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum HashAlg {
    #[default]
    Sha256 = 1,
    Sha256_128 = 2,
    Sha256_120 = 3,
    Sha256_96 = 4,
    Sha256_64 = 5,
    Sha256_32 = 6,
    Sha384 = 7,
    Sha512 = 8,
    Sha3_224 = 9,
    Sha3_256 = 10,
    Sha3_384 = 11,
    Sha3_512 = 12,
}

impl HashAlg {
    pub const ALL: [Self; 12] = [
        Self::Sha256,
        Self::Sha256_128,
        Self::Sha256_120,
        Self::Sha256_96,
        Self::Sha256_64,
        Self::Sha256_32,
        Self::Sha384,
        Self::Sha512,
        Self::Sha3_224,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
    ];

    #[must_use]
    pub const fn id(self) -> u64 {
        self as u64
    }

    #[must_use]
    pub fn from_id(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|alg| alg.id() == id)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "sha-256",
            Self::Sha256_128 => "sha-256-128",
            Self::Sha256_120 => "sha-256-120",
            Self::Sha256_96 => "sha-256-96",
            Self::Sha256_64 => "sha-256-64",
            Self::Sha256_32 => "sha-256-32",
            Self::Sha384 => "sha-384",
            Self::Sha512 => "sha-512",
            Self::Sha3_224 => "sha3-224",
            Self::Sha3_256 => "sha3-256",
            Self::Sha3_384 => "sha3-384",
            Self::Sha3_512 => "sha3-512",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|alg| alg.name() == name)
    }

    /// Digest length in bytes.
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha256 | Self::Sha3_256 => 32,
            Self::Sha256_128 => 16,
            Self::Sha256_120 => 15,
            Self::Sha256_96 => 12,
            Self::Sha256_64 => 8,
            Self::Sha256_32 => 4,
            Self::Sha384 | Self::Sha3_384 => 48,
            Self::Sha512 | Self::Sha3_512 => 64,
            Self::Sha3_224 => 28,
        }
    }
}

impl fmt::Display for HashAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

///
/// Digest
///
/// `[alg-id, value]` in the binary form, `"alg-name;base64"` in text.
///

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Digest {
    pub alg: HashAlg,
    pub value: Vec<u8>,
}

impl Digest {
    pub fn new(alg: HashAlg, value: impl Into<Vec<u8>>) -> Result<Self, ChoiceError> {
        let digest = Self {
            alg,
            value: value.into(),
        };
        digest.check()?;

        Ok(digest)
    }

    fn check(&self) -> Result<(), ChoiceError> {
        let expected = self.alg.digest_len();
        if self.value.len() != expected {
            return Err(ChoiceError::invalid(
                "digest",
                format!(
                    "length mismatch for hash algorithm {}: expected {expected} bytes, got {}",
                    self.alg,
                    self.value.len()
                ),
            ));
        }

        Ok(())
    }

    fn from_parts(id: u64, value: Vec<u8>) -> Result<Self, ChoiceError> {
        let alg = HashAlg::from_id(id)
            .ok_or_else(|| ChoiceError::invalid("digest", format!("unknown hash algorithm {id}")))?;

        Ok(Self { alg, value })
    }

    fn to_cbor(&self) -> CborValue {
        CborValue::Array(vec![
            CborValue::Integer(i128::from(self.alg.id())),
            CborValue::Bytes(self.value.clone()),
        ])
    }

    fn from_cbor(value: &CborValue) -> Result<Self, ChoiceError> {
        match value {
            CborValue::Array(items) => match items.as_slice() {
                [CborValue::Integer(id), CborValue::Bytes(value)] => {
                    let id = u64::try_from(*id)
                        .map_err(|_| ChoiceError::invalid("digest", format!("unknown hash algorithm {id}")))?;
                    Self::from_parts(id, value.clone())
                }
                _ => Err(ChoiceError::unexpected("digest", "[alg, bytes]", items)),
            },
            other => Err(ChoiceError::unexpected("digest", "array", other)),
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.alg, STANDARD.encode(&self.value))
    }
}

impl FromStr for Digest {
    type Err = ChoiceError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (name, value) = text
            .split_once(';')
            .ok_or_else(|| ChoiceError::invalid("digest", format!("{text:?} is not in alg;base64 form")))?;
        let alg = HashAlg::from_name(name)
            .ok_or_else(|| ChoiceError::invalid("digest", format!("unknown hash algorithm {name:?}")))?;

        Ok(Self {
            alg,
            value: decode_base64("digest", value)?,
        })
    }
}

impl Validate for Digest {
    fn validate(&self) -> Result<(), ValidateError> {
        self.check().map_err(Into::into)
    }
}

impl FieldValue for Digest {
    fn encode<F: Format>(&self, _cx: &Context<'_>) -> Result<F::Value, CodecError> {
        match F::KIND {
            WireFormat::Cbor => Ok(F::array(vec![F::to_value(&self.alg.id())?, F::bytes(&self.value)])),
            WireFormat::Json => F::to_value(&self.to_string()),
        }
    }

    fn decode<F: Format>(value: F::Value, _cx: &Context<'_>) -> Result<Self, CodecError> {
        match F::KIND {
            WireFormat::Cbor => {
                let [alg, bytes]: [F::Value; 2] = F::to_array(value)?
                    .try_into()
                    .map_err(|items: Vec<_>| CodecError::Scalar(format!("digest expects 2 items, found {}", items.len())))?;

                Ok(Self::from_parts(F::from_value(alg)?, F::to_bytes(bytes)?)?)
            }
            WireFormat::Json => Ok(F::from_value::<String>(value)?.parse()?),
        }
    }
}

///
/// Thumbprint
///
/// Digest of a key or certificate, used as a crypto-key variant.
///

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Thumbprint(pub Digest);

impl fmt::Display for Thumbprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl ChoiceValue for Thumbprint {
    fn type_name(&self) -> &'static str {
        "thumbprint"
    }

    fn tag(&self) -> u64 {
        THUMBPRINT_TAG
    }

    fn validate(&self) -> Result<(), ChoiceError> {
        self.0.check()
    }

    fn bytes(&self) -> Vec<u8> {
        self.0.value.clone()
    }

    fn cbor_payload(&self) -> Result<CborValue, ChoiceError> {
        Ok(self.0.to_cbor())
    }

    fn json_value(&self) -> Result<JsonValue, ChoiceError> {
        Ok(JsonValue::String(self.0.to_string()))
    }
}

impl ParseVariant for Thumbprint {
    fn from_text(text: &str) -> Result<Self, ChoiceError> {
        text.parse().map(Self)
    }

    fn from_cbor(payload: &CborValue) -> Result<Self, ChoiceError> {
        Digest::from_cbor(payload).map(Self)
    }
}
