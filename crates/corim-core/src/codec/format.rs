use crate::{
    choice::{ChoiceRegistry, TypeChoice},
    codec::{CodecError, Context, FieldWriter, RawMap},
    config::CodecConfig,
    extension::FieldExtension,
    model::{FieldSpec, Layout},
    serialize::SerializeError,
};
use derive_more::Display;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;

///
/// WireFormat
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum WireFormat {
    #[display("cbor")]
    Cbor,
    #[display("json")]
    Json,
}

///
/// Format
///
/// One wire format, seen through its raw value tree. Implementations
/// own every format-specific decision: how map keys are spelled, how
/// byte strings and type choices are carried, and which backend turns
/// the tree into bytes.
///

pub trait Format: Sized + 'static {
    /// Raw value tree of the backend.
    type Value: Clone + fmt::Debug + PartialEq;
    /// Map key as it appears on the wire.
    type Key: Clone + fmt::Debug + fmt::Display + Ord;

    const KIND: WireFormat;

    fn key_of(field: &FieldSpec) -> Self::Key;

    /// Build a record value from `(field, value)` pairs in write order.
    fn assemble(layout: Layout, entries: Vec<(&'static FieldSpec, Self::Value)>) -> Self::Value;

    /// Split a record value into `(key, value)` pairs.
    fn disassemble(layout: Layout, value: Self::Value) -> Result<Vec<(Self::Key, Self::Value)>, CodecError>;

    /// Borrow one field of a map-layout record value.
    fn lookup<'v>(value: &'v Self::Value, field: &FieldSpec) -> Option<&'v Self::Value>;

    fn to_value<T: Serialize>(value: &T) -> Result<Self::Value, CodecError>;
    fn from_value<T: DeserializeOwned>(value: Self::Value) -> Result<T, CodecError>;

    fn bytes(bytes: &[u8]) -> Self::Value;
    fn to_bytes(value: Self::Value) -> Result<Vec<u8>, CodecError>;

    fn array(items: Vec<Self::Value>) -> Self::Value;
    fn to_array(value: Self::Value) -> Result<Vec<Self::Value>, CodecError>;

    /// Carry a type-choice value with its discriminator.
    fn encode_choice<T: TypeChoice>(value: &T) -> Result<Self::Value, CodecError>;

    /// Read the discriminator and let the family registry build the value.
    fn decode_choice<T: TypeChoice>(
        value: Self::Value,
        registry: &ChoiceRegistry<T>,
    ) -> Result<T, CodecError>;

    fn encode_extension(
        fields: &dyn FieldExtension,
        out: &mut FieldWriter<Self>,
        cx: &Context<'_>,
    ) -> Result<(), CodecError>;

    fn decode_extension(
        fields: &mut dyn FieldExtension,
        raw: &mut RawMap<Self>,
        cx: &Context<'_>,
    ) -> Result<(), CodecError>;

    fn serialize(value: &Self::Value, config: &CodecConfig) -> Result<Vec<u8>, SerializeError>;
    fn deserialize(bytes: &[u8], config: &CodecConfig) -> Result<Self::Value, SerializeError>;
}
