use crate::serialize::SerializeError;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use std::{collections::BTreeSet, fmt};

///
/// KeyScan
///
/// Walks one encoded data item without materializing it and records the
/// first map key that appears twice inside the same map. Both backends
/// collapse duplicate keys silently when they build value trees, so the
/// scan runs before the tree is built.
///

#[derive(Debug, Default)]
pub(super) struct KeyScan {
    duplicate: Option<String>,
}

impl KeyScan {
    pub(super) fn into_result(self) -> Result<(), SerializeError> {
        match self.duplicate {
            Some(key) => Err(SerializeError::DuplicateKey { key }),
            None => Ok(()),
        }
    }

    fn merge(&mut self, other: Self) {
        if self.duplicate.is_none() {
            self.duplicate = other.duplicate;
        }
    }
}

impl<'de> Deserialize<'de> for KeyScan {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScanVisitor)
    }
}

struct ScanVisitor;

impl<'de> Visitor<'de> for ScanVisitor {
    type Value = KeyScan;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any data item")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<KeyScan, E> {
        Ok(KeyScan::default())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<KeyScan, E> {
        Ok(KeyScan::default())
    }

    fn visit_i128<E: de::Error>(self, _: i128) -> Result<KeyScan, E> {
        Ok(KeyScan::default())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<KeyScan, E> {
        Ok(KeyScan::default())
    }

    fn visit_u128<E: de::Error>(self, _: u128) -> Result<KeyScan, E> {
        Ok(KeyScan::default())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<KeyScan, E> {
        Ok(KeyScan::default())
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<KeyScan, E> {
        Ok(KeyScan::default())
    }

    fn visit_bytes<E: de::Error>(self, _: &[u8]) -> Result<KeyScan, E> {
        Ok(KeyScan::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<KeyScan, E> {
        Ok(KeyScan::default())
    }

    fn visit_unit<E: de::Error>(self) -> Result<KeyScan, E> {
        Ok(KeyScan::default())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<KeyScan, D::Error>
    where
        D: Deserializer<'de>,
    {
        KeyScan::deserialize(deserializer)
    }

    // CBOR tags surface as newtype structs.
    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<KeyScan, D::Error>
    where
        D: Deserializer<'de>,
    {
        KeyScan::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<KeyScan, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut out = KeyScan::default();
        while let Some(item) = seq.next_element::<KeyScan>()? {
            out.merge(item);
        }

        Ok(out)
    }

    fn visit_map<A>(self, mut map: A) -> Result<KeyScan, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut out = KeyScan::default();
        let mut seen = BTreeSet::new();

        while let Some(key) = map.next_key::<ScanKey>()? {
            let value = map.next_value::<KeyScan>()?;

            if out.duplicate.is_none() && !matches!(key, ScanKey::Composite) {
                let label = key.to_string();
                if !seen.insert(key) {
                    out.duplicate = Some(label);
                }
            }
            out.merge(value);
        }

        Ok(out)
    }
}

///
/// ScanKey
///
/// Comparable projection of a map key. Array or map keys are never
/// compared and count as distinct.
///

#[derive(Debug, Eq, Ord, PartialEq, PartialOrd)]
enum ScanKey {
    Int(i128),
    Text(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Float(u64),
    Null,
    Composite,
}

impl fmt::Display for ScanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Bytes(v) => write!(f, "h'{}'", hex::encode(v)),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
            Self::Null => f.write_str("null"),
            Self::Composite => f.write_str("<composite>"),
        }
    }
}

impl<'de> Deserialize<'de> for ScanKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScanKeyVisitor)
    }
}

struct ScanKeyVisitor;

impl<'de> Visitor<'de> for ScanKeyVisitor {
    type Value = ScanKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map key")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<ScanKey, E> {
        Ok(ScanKey::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ScanKey, E> {
        Ok(ScanKey::Int(i128::from(v)))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<ScanKey, E> {
        Ok(ScanKey::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ScanKey, E> {
        Ok(ScanKey::Int(i128::from(v)))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<ScanKey, E> {
        Ok(i128::try_from(v).map_or(ScanKey::Composite, ScanKey::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ScanKey, E> {
        Ok(ScanKey::Float(v.to_bits()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ScanKey, E> {
        Ok(ScanKey::Text(v.to_string()))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<ScanKey, E> {
        Ok(ScanKey::Bytes(v.to_vec()))
    }

    fn visit_none<E: de::Error>(self) -> Result<ScanKey, E> {
        Ok(ScanKey::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<ScanKey, E> {
        Ok(ScanKey::Null)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<ScanKey, D::Error>
    where
        D: Deserializer<'de>,
    {
        KeyScan::deserialize(deserializer)?;
        Ok(ScanKey::Composite)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<ScanKey, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(ScanKey::Composite)
    }

    fn visit_map<A>(self, mut map: A) -> Result<ScanKey, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(ScanKey::Composite)
    }
}
