use crate::{
    choice::{ChoiceError, ChoiceInput, ChoiceRegistry, TypeChoice},
    codec::{CodecError, Context, FieldWriter, Format, RawMap, WireFormat},
    config::CodecConfig,
    extension::FieldExtension,
    model::{FieldSpec, Layout},
    serialize::{self, SerializeError},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

const TYPE_MEMBER: &str = "type";
const VALUE_MEMBER: &str = "value";
static NULL: Value = Value::Null;

///
/// Json
///
/// Text form: objects keyed by field name in schema order, byte strings
/// as standard base64, type choices as `{"type": .., "value": ..}`.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct Json;

impl Format for Json {
    type Value = Value;
    type Key = String;

    const KIND: WireFormat = WireFormat::Json;

    fn key_of(field: &FieldSpec) -> String {
        field.name.to_string()
    }

    // Layout only affects the binary form.
    fn assemble(_layout: Layout, entries: Vec<(&'static FieldSpec, Value)>) -> Value {
        Value::Object(
            entries
                .into_iter()
                .map(|(field, value)| (field.name.to_string(), value))
                .collect(),
        )
    }

    fn disassemble(_layout: Layout, value: Value) -> Result<Vec<(String, Value)>, CodecError> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(CodecError::UnexpectedType {
                expected: "object",
                found: describe(&other),
            }),
        }
    }

    fn lookup<'v>(value: &'v Value, field: &FieldSpec) -> Option<&'v Value> {
        value.as_object().and_then(|map| map.get(field.name))
    }

    fn to_value<T: Serialize>(value: &T) -> Result<Value, CodecError> {
        serde_json::to_value(value).map_err(|e| CodecError::Scalar(e.to_string()))
    }

    fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, CodecError> {
        serde_json::from_value(value).map_err(|e| CodecError::Scalar(e.to_string()))
    }

    fn bytes(bytes: &[u8]) -> Value {
        Value::String(STANDARD.encode(bytes))
    }

    fn to_bytes(value: Value) -> Result<Vec<u8>, CodecError> {
        match value {
            Value::String(text) => STANDARD
                .decode(text)
                .map_err(|e| CodecError::Scalar(format!("bad base64: {e}"))),
            other => Err(CodecError::UnexpectedType {
                expected: "base64 string",
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
        let mut out = Map::new();
        out.insert(TYPE_MEMBER.to_string(), Value::String(value.type_name().to_string()));
        out.insert(VALUE_MEMBER.to_string(), value.variant().json_value()?);

        Ok(Value::Object(out))
    }

    fn decode_choice<T: TypeChoice>(value: Value, registry: &ChoiceRegistry<T>) -> Result<T, CodecError> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(CodecError::UnexpectedType {
                    expected: "type/value object",
                    found: describe(&other),
                });
            }
        };

        let extra: Vec<&str> = map
            .keys()
            .map(String::as_str)
            .filter(|key| *key != TYPE_MEMBER && *key != VALUE_MEMBER)
            .collect();
        if !extra.is_empty() {
            return Err(CodecError::UnknownFields {
                entity: T::FAMILY,
                keys: extra.join(", "),
            });
        }

        let type_name = match map.get(TYPE_MEMBER) {
            Some(Value::String(name)) if !name.is_empty() => name.as_str(),
            Some(Value::String(_)) | None => {
                return Err(ChoiceError::MissingDiscriminator { family: T::FAMILY }.into());
            }
            Some(other) => {
                return Err(CodecError::UnexpectedType {
                    expected: "type name string",
                    found: describe(other),
                });
            }
        };
        let payload = map.get(VALUE_MEMBER).unwrap_or(&NULL);

        Ok(registry.resolve_by_name(type_name, ChoiceInput::Json(payload))?)
    }

    fn encode_extension(
        fields: &dyn FieldExtension,
        out: &mut FieldWriter<Self>,
        cx: &Context<'_>,
    ) -> Result<(), CodecError> {
        fields.encode_json(out, cx)
    }

    fn decode_extension(
        fields: &mut dyn FieldExtension,
        raw: &mut RawMap<Self>,
        cx: &Context<'_>,
    ) -> Result<(), CodecError> {
        fields.decode_json(raw, cx)
    }

    fn serialize(value: &Value, config: &CodecConfig) -> Result<Vec<u8>, SerializeError> {
        serialize::to_json(value, config.pretty_json)
    }

    fn deserialize(bytes: &[u8], config: &CodecConfig) -> Result<Value, SerializeError> {
        serialize::from_json_bounded(bytes, config.max_input_bytes)
    }
}

#[must_use]
pub(crate) const fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
