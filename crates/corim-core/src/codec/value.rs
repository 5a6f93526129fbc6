use crate::codec::{CodecError, Context, Format};
use derive_more::{Deref, From};

///
/// FieldValue
///
/// A value that can sit under one field key. `is_empty` drives the
/// omission of optional fields.
///

pub trait FieldValue: Sized {
    fn encode<F: Format>(&self, cx: &Context<'_>) -> Result<F::Value, CodecError>;

    fn decode<F: Format>(value: F::Value, cx: &Context<'_>) -> Result<Self, CodecError>;

    fn is_empty(&self) -> bool {
        false
    }
}

// Scalars go through the backend's serde mapping.
macro_rules! scalar_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn encode<F: Format>(&self, _cx: &Context<'_>) -> Result<F::Value, CodecError> {
                    F::to_value(self)
                }

                fn decode<F: Format>(value: F::Value, _cx: &Context<'_>) -> Result<Self, CodecError> {
                    F::from_value(value)
                }
            }
        )*
    };
}

scalar_field!(bool, u8, u16, u32, u64, i8, i16, i32, i64);

impl FieldValue for String {
    fn encode<F: Format>(&self, _cx: &Context<'_>) -> Result<F::Value, CodecError> {
        F::to_value(self)
    }

    fn decode<F: Format>(value: F::Value, _cx: &Context<'_>) -> Result<Self, CodecError> {
        F::from_value(value)
    }

    fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn encode<F: Format>(&self, cx: &Context<'_>) -> Result<F::Value, CodecError> {
        let items = self
            .iter()
            .enumerate()
            .map(|(index, item)| item.encode::<F>(cx).map_err(|e| e.at_index(index)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(F::array(items))
    }

    fn decode<F: Format>(value: F::Value, cx: &Context<'_>) -> Result<Self, CodecError> {
        F::to_array(value)?
            .into_iter()
            .enumerate()
            .map(|(index, item)| T::decode::<F>(item, cx).map_err(|e| e.at_index(index)))
            .collect()
    }

    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

///
/// Bytes
///
/// Opaque byte string: a CBOR byte string, or base64 text in JSON.
///

#[derive(Clone, Debug, Default, Deref, Eq, From, Hash, Ord, PartialEq, PartialOrd)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl FieldValue for Bytes {
    fn encode<F: Format>(&self, _cx: &Context<'_>) -> Result<F::Value, CodecError> {
        Ok(F::bytes(&self.0))
    }

    fn decode<F: Format>(value: F::Value, _cx: &Context<'_>) -> Result<Self, CodecError> {
        F::to_bytes(value).map(Self)
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
