//! Schema-driven field codec.
//!
//! Records describe themselves with a static [`EntitySchema`] and move
//! their fields through a [`FieldWriter`] (encode) or a [`RawMap`]
//! (decode). The same record code serves both wire formats; the
//! [`Format`] parameter decides how keys, bytes and type choices look.

mod cbor;
mod format;
mod json;
mod map;
mod value;

#[cfg(test)]
mod tests;

pub use cbor::Cbor;
pub use format::{Format, WireFormat};
pub use json::Json;
pub use map::{FieldWriter, RawMap};
pub use value::{Bytes, FieldValue};

use crate::{
    choice::{ChoiceError, ChoiceRegistry, Registries, TypeChoice},
    config::CodecConfig,
    error::ErrorKind,
    extension::{AttachError, ExtensionError, ExtensionMap, Hooks, Redirect},
    model::{EntitySchema, FieldSpec},
    serialize::{SerializeError, SerializeErrorKind},
};
use thiserror::Error as ThisError;

///
/// CodecError
///

#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("missing mandatory field {field:?} ({key})")]
    MissingField {
        entity: &'static str,
        field: &'static str,
        key: u64,
    },

    #[error("{entity}: unexpected fields [{keys}]")]
    UnknownFields { entity: &'static str, keys: String },

    #[error("expected {expected}, found {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{entity}: field {field:?} ({key}) written twice")]
    KeyCollision {
        entity: &'static str,
        field: &'static str,
        key: u64,
    },

    #[error("field {field:?}: {source}")]
    Field {
        field: &'static str,
        source: Box<CodecError>,
    },

    #[error("item {index}: {source}")]
    Item {
        index: usize,
        source: Box<CodecError>,
    },

    #[error("invalid scalar: {0}")]
    Scalar(String),

    #[error(transparent)]
    Choice(#[from] ChoiceError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Attach(#[from] AttachError),

    #[error(transparent)]
    Extension(#[from] ExtensionError),
}

impl CodecError {
    /// Wrap this error with the name of the field it occurred in.
    #[must_use]
    pub fn in_field(self, field: &'static str) -> Self {
        Self::Field {
            field,
            source: Box::new(self),
        }
    }

    #[must_use]
    pub fn at_index(self, index: usize) -> Self {
        Self::Item {
            index,
            source: Box::new(self),
        }
    }

    /// Field names from the outermost wrapper inwards.
    #[must_use]
    pub fn field_path(&self) -> Vec<&'static str> {
        let mut path = Vec::new();
        let mut current = self;
        loop {
            match current {
                Self::Field { field, source } => {
                    path.push(*field);
                    current = &**source;
                }
                Self::Item { source, .. } => current = &**source,
                _ => return path,
            }
        }
    }

    /// The innermost error, with field and item wrappers removed.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Field { source, .. } | Self::Item { source, .. } => source.root_cause(),
            other => other,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField { .. }
            | Self::UnknownFields { .. }
            | Self::UnexpectedType { .. }
            | Self::KeyCollision { .. }
            | Self::Scalar(_) => ErrorKind::Schema,
            Self::Field { source, .. } | Self::Item { source, .. } => source.kind(),
            Self::Choice(err) => err.kind(),
            Self::Serialize(err) => match err.kind() {
                SerializeErrorKind::DuplicateKey => ErrorKind::Schema,
                _ => ErrorKind::Serialize,
            },
            Self::Attach(err) => err.kind(),
            Self::Extension(_) => ErrorKind::Extension,
        }
    }
}

///
/// Context
///
/// Read-only state threaded through one encode or decode: the choice
/// registries and, when decoding under a profile, the hooks to attach
/// to every nested extensible record.
///

#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    registries: &'a Registries,
    hooks: Option<Hooks<'a>>,
}

impl<'a> Context<'a> {
    #[must_use]
    pub const fn new(registries: &'a Registries) -> Self {
        Self {
            registries,
            hooks: None,
        }
    }

    #[must_use]
    pub fn with_extensions(mut self, extensions: Option<&'a ExtensionMap>) -> Self {
        self.hooks = extensions.map(Hooks::new);
        self
    }

    /// Context for a subtree whose records take their hooks from
    /// redirected points.
    #[must_use]
    pub fn redirect(mut self, redirects: &'static [Redirect]) -> Self {
        self.hooks = self.hooks.map(|hooks| hooks.redirect(redirects));
        self
    }

    #[must_use]
    pub const fn registries(&self) -> &'a Registries {
        self.registries
    }

    #[must_use]
    pub const fn hooks(&self) -> Option<Hooks<'a>> {
        self.hooks
    }

    #[must_use]
    pub fn extensions(&self) -> Option<&'a ExtensionMap> {
        self.hooks.map(|hooks| hooks.map())
    }

    /// Registry for choice family `T`.
    pub fn choices<T: TypeChoice>(&self) -> Result<&'a ChoiceRegistry<T>, ChoiceError> {
        self.registries.family::<T>()
    }
}

///
/// Record
///
/// A codec-backed entity. `encode_fields` and `decode_fields` move the
/// entity's own fields, its embedded sub-records (flattened into the same
/// map) and any fields contributed by an attached extension hook.
///

pub trait Record: Default + 'static {
    fn schema() -> &'static EntitySchema;

    fn encode_fields<F: Format>(
        &self,
        out: &mut FieldWriter<F>,
        cx: &Context<'_>,
    ) -> Result<(), CodecError>;

    fn decode_fields<F: Format>(
        &mut self,
        raw: &mut RawMap<F>,
        cx: &Context<'_>,
    ) -> Result<(), CodecError>;

    /// Attach hooks to this record and to the extensible records it
    /// holds. Records without extension points keep the default no-op.
    fn attach_extensions(&mut self, _hooks: Hooks<'_>) -> Result<(), AttachError> {
        Ok(())
    }
}

/// Encode a record into a raw value of format `F`.
pub fn encode_record<F: Format, R: Record>(record: &R, cx: &Context<'_>) -> Result<F::Value, CodecError> {
    let schema = R::schema();
    let mut out = FieldWriter::<F>::new(schema.entity);
    record.encode_fields(&mut out, cx)?;

    Ok(out.finish(schema.layout))
}

/// Decode a fresh record, attaching the context's hooks first.
pub fn decode_record<F: Format, R: Record>(value: F::Value, cx: &Context<'_>) -> Result<R, CodecError> {
    let mut record = R::default();
    if let Some(hooks) = cx.hooks() {
        record.attach_extensions(hooks)?;
    }
    decode_into::<F, R>(&mut record, value, cx)?;

    Ok(record)
}

/// Decode into an existing record whose hooks are already attached.
///
/// Entries left over once the record and its hooks have taken their
/// fields are rejected.
pub fn decode_into<F: Format, R: Record>(
    record: &mut R,
    value: F::Value,
    cx: &Context<'_>,
) -> Result<(), CodecError> {
    let schema = R::schema();
    let mut raw = RawMap::<F>::new(schema.entity, F::disassemble(schema.layout, value)?);
    record.decode_fields(&mut raw, cx)?;

    raw.finish()
}

/// Encode a record to bytes.
pub fn to_bytes<F: Format, R: Record>(
    record: &R,
    cx: &Context<'_>,
    config: &CodecConfig,
) -> Result<Vec<u8>, CodecError> {
    let value = encode_record::<F, R>(record, cx)?;

    Ok(F::serialize(&value, config)?)
}

/// Decode bytes into an existing record.
pub fn from_bytes_into<F: Format, R: Record>(
    record: &mut R,
    bytes: &[u8],
    cx: &Context<'_>,
    config: &CodecConfig,
) -> Result<(), CodecError> {
    let value = F::deserialize(bytes, config)?;

    decode_into::<F, R>(record, value, cx)
}

/// Read one top-level field without decoding the rest of the document.
pub fn peek<F: Format, T: FieldValue>(
    value: &F::Value,
    field: &'static FieldSpec,
    cx: &Context<'_>,
) -> Result<Option<T>, CodecError> {
    F::lookup(value, field)
        .map(|raw| T::decode::<F>(raw.clone(), cx).map_err(|e| e.in_field(field.name)))
        .transpose()
}
