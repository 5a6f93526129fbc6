use crate::{
    choice::{ChoiceError, ChoiceInput, ChoiceRegistry, TypeChoice},
    codec::{CodecError, Context, FieldWriter, Format, RawMap, WireFormat},
    config::CodecConfig,
    extension::FieldExtension,
    model::{FieldSpec, Layout},
    serialize::{self, SerializeError},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_cbor::Value;

///
/// Cbor
///
/// Binary form: integer-keyed maps (or positional arrays for array-layout
/// records), type choices as tagged payloads.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct Cbor;

impl Format for Cbor {
    type Value = Value;
    type Key = u64;

    const KIND: WireFormat = WireFormat::Cbor;

    fn key_of(field: &FieldSpec) -> u64 {
        field.key
    }

    fn assemble(layout: Layout, entries: Vec<(&'static FieldSpec, Value)>) -> Value {
        match layout {
            Layout::Map => Value::Map(
                entries
                    .into_iter()
                    .map(|(field, value)| (Value::Integer(i128::from(field.key)), value))
                    .collect(),
            ),
            Layout::Array => {
                let mut entries = entries;
                entries.sort_by_key(|(field, _)| field.key);
                Value::Array(entries.into_iter().map(|(_, value)| value).collect())
            }
        }
    }

    fn disassemble(layout: Layout, value: Value) -> Result<Vec<(u64, Value)>, CodecError> {
        match (layout, value) {
            (Layout::Map, Value::Map(map)) => map
                .into_iter()
                .map(|(key, value)| match key {
                    Value::Integer(i) => u64::try_from(i).map(|k| (k, value)).map_err(|_| {
                        CodecError::UnexpectedType {
                            expected: "unsigned integer key",
                            found: "negative integer",
                        }
                    }),
                    other => Err(CodecError::UnexpectedType {
                        expected: "unsigned integer key",
                        found: describe(&other),
                    }),
                })
                .collect(),
            (Layout::Array, Value::Array(items)) => Ok((0u64..).zip(items).collect()),
            (Layout::Map, other) => Err(CodecError::UnexpectedType {
                expected: "map",
                found: describe(&other),
            }),
            (Layout::Array, other) => Err(CodecError::UnexpectedType {
                expected: "array",
                found: describe(&other),
            }),
        }
    }

    fn lookup<'v>(value: &'v Value, field: &FieldSpec) -> Option<&'v Value> {
        match value {
            Value::Map(map) => map.get(&Value::Integer(i128::from(field.key))),
            _ => None,
        }
    }

    fn to_value<T: Serialize>(value: &T) -> Result<Value, CodecError> {
        serde_cbor::value::to_value(value).map_err(|e| CodecError::Scalar(e.to_string()))
    }

    fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, CodecError> {
        serde_cbor::value::from_value(value).map_err(|e| CodecError::Scalar(e.to_string()))
    }

    fn bytes(bytes: &[u8]) -> Value {
        Value::Bytes(bytes.to_vec())
    }

    fn to_bytes(value: Value) -> Result<Vec<u8>, CodecError> {
        match value {
            Value::Bytes(bytes) => Ok(bytes),
            other => Err(CodecError::UnexpectedType {
                expected: "byte string",
                found: describe(&other),
            }),
        }
    }

    fn array(items: Vec<Value>) -> Value {
        Value::Array(items)
    }

    fn to_array(value: Value) -> Result<Vec<Value>, CodecError> {
        match value {
            Value::Array(items) => Ok(items),
            other => Err(CodecError::UnexpectedType {
                expected: "array",
                found: describe(&other),
            }),
        }
    }

    fn encode_choice<T: TypeChoice>(value: &T) -> Result<Value, CodecError> {
        let payload = value.variant().cbor_payload()?;

        Ok(Value::Tag(value.tag(), Box::new(payload)))
    }

    fn decode_choice<T: TypeChoice>(value: Value, registry: &ChoiceRegistry<T>) -> Result<T, CodecError> {
        match value {
            Value::Tag(tag, payload) => Ok(registry.resolve_by_tag(tag, ChoiceInput::Cbor(&payload))?),
            _ => Err(ChoiceError::MissingDiscriminator { family: T::FAMILY }.into()),
        }
    }

    fn encode_extension(
        fields: &dyn FieldExtension,
        out: &mut FieldWriter<Self>,
        cx: &Context<'_>,
    ) -> Result<(), CodecError> {
        fields.encode_cbor(out, cx)
    }

    fn decode_extension(
        fields: &mut dyn FieldExtension,
        raw: &mut RawMap<Self>,
        cx: &Context<'_>,
    ) -> Result<(), CodecError> {
        fields.decode_cbor(raw, cx)
    }

    fn serialize(value: &Value, _config: &CodecConfig) -> Result<Vec<u8>, SerializeError> {
        serialize::to_cbor(value)
    }

    fn deserialize(bytes: &[u8], config: &CodecConfig) -> Result<Value, SerializeError> {
        serialize::from_cbor_bounded(bytes, config.max_input_bytes)
    }
}

/// Short name of a value's major type, for diagnostics.
#[must_use]
pub(crate) const fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Integer(_) => "integer",
        Value::Float(_) => "float",
        Value::Bytes(_) => "byte string",
        Value::Text(_) => "text string",
        Value::Array(_) => "array",
        Value::Map(_) => "map",
        Value::Tag(..) => "tagged value",
        _ => "unknown",
    }
}

