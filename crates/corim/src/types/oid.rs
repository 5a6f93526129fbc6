use corim_core::prelude::*;
use serde_cbor::Value as CborValue;
use serde_json::Value as JsonValue;
use std::{fmt, str::FromStr};

const TYPE_NAME: &str = "oid";
pub const OID_TAG: u64 = 111;

///
/// Oid
///
/// Object identifier held as its arcs. Carried as BER content octets in
/// the binary form and as dotted decimal text.
///

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Oid(Vec<u64>);

impl Oid {
    /// Build from arcs, checking the first two against the BER rules.
    pub fn from_arcs(arcs: impl Into<Vec<u64>>) -> Result<Self, ChoiceError> {
        let oid = Self(arcs.into());
        oid.check()?;

        Ok(oid)
    }

    /// Decode BER content octets (no identifier or length).
    pub fn from_ber(bytes: &[u8]) -> Result<Self, ChoiceError> {
        if bytes.is_empty() {
            return Err(ChoiceError::invalid(TYPE_NAME, "empty OID"));
        }

        let mut subids = Vec::new();
        let mut current: u64 = 0;
        let mut started = false;
        for &byte in bytes {
            if !started && byte == 0x80 {
                return Err(ChoiceError::invalid(TYPE_NAME, "non-minimal arc encoding"));
            }
            started = true;
            if current.leading_zeros() < 7 {
                return Err(ChoiceError::invalid(TYPE_NAME, "arc overflows 64 bits"));
            }
            current = (current << 7) | u64::from(byte & 0x7f);
            if byte & 0x80 == 0 {
                subids.push(current);
                current = 0;
                started = false;
            }
        }
        if started {
            return Err(ChoiceError::invalid(TYPE_NAME, "truncated arc"));
        }

        // first subidentifier packs the first two arcs
        let first = subids[0];
        let (a0, a1) = match first {
            0..40 => (0, first),
            40..80 => (1, first - 40),
            _ => (2, first - 80),
        };
        let mut arcs = Vec::with_capacity(subids.len() + 1);
        arcs.extend([a0, a1]);
        arcs.extend_from_slice(&subids[1..]);

        Ok(Self(arcs))
    }

    /// BER content octets.
    pub fn to_ber(&self) -> Result<Vec<u8>, ChoiceError> {
        self.check()?;

        let first = self.0[0]
            .checked_mul(40)
            .and_then(|v| v.checked_add(self.0[1]))
            .ok_or_else(|| ChoiceError::invalid(TYPE_NAME, "second arc too large"))?;

        let mut out = Vec::new();
        for subid in std::iter::once(first).chain(self.0[2..].iter().copied()) {
            push_base128(&mut out, subid);
        }

        Ok(out)
    }

    #[must_use]
    pub fn arcs(&self) -> &[u64] {
        &self.0
    }

    fn check(&self) -> Result<(), ChoiceError> {
        match self.0.as_slice() {
            [] => Err(ChoiceError::invalid(TYPE_NAME, "empty OID")),
            [_] => Err(ChoiceError::invalid(TYPE_NAME, "OID must have at least two arcs")),
            [a0, _, ..] if *a0 > 2 => Err(ChoiceError::invalid(
                TYPE_NAME,
                format!("first arc must be 0, 1 or 2, got {a0}"),
            )),
            [a0, a1, ..] if *a0 < 2 && *a1 >= 40 => Err(ChoiceError::invalid(
                TYPE_NAME,
                format!("second arc must be below 40 under arc {a0}, got {a1}"),
            )),
            _ => Ok(()),
        }
    }
}

fn push_base128(out: &mut Vec<u8>, value: u64) {
    let mut groups = vec![(value & 0x7f) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        groups.push(((rest & 0x7f) as u8) | 0x80);
        rest >>= 7;
    }
    out.extend(groups.into_iter().rev());
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, arc) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{arc}")?;
        }

        Ok(())
    }
}

impl FromStr for Oid {
    type Err = ChoiceError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let arcs = text
            .split('.')
            .map(|arc| {
                if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ChoiceError::invalid(
                        TYPE_NAME,
                        format!("malformed arc {arc:?} in {text:?}"),
                    ));
                }
                arc.parse::<u64>()
                    .map_err(|e| ChoiceError::invalid(TYPE_NAME, format!("arc {arc:?}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_arcs(arcs)
    }
}

impl ChoiceValue for Oid {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn tag(&self) -> u64 {
        OID_TAG
    }

    fn validate(&self) -> Result<(), ChoiceError> {
        self.check()
    }

    fn bytes(&self) -> Vec<u8> {
        self.to_ber().unwrap_or_default()
    }

    fn cbor_payload(&self) -> Result<CborValue, ChoiceError> {
        self.to_ber().map(CborValue::Bytes)
    }

    fn json_value(&self) -> Result<JsonValue, ChoiceError> {
        self.check()?;

        Ok(JsonValue::String(self.to_string()))
    }
}

impl ParseVariant for Oid {
    fn from_text(text: &str) -> Result<Self, ChoiceError> {
        text.parse()
    }

    fn from_cbor(payload: &CborValue) -> Result<Self, ChoiceError> {
        match payload {
            CborValue::Bytes(bytes) => Self::from_ber(bytes),
            other => Err(ChoiceError::unexpected(TYPE_NAME, "byte string", other)),
        }
    }
}
