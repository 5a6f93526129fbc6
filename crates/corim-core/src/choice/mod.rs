//! Type-choice values: one field, one of an open set of variants.
//!
//! Built-in variants of a family live in a closed enum so the compiler
//! checks every match; third-party variants ride in its `Extension`
//! arm as a boxed [`ChoiceValue`]. Decoding always goes through the
//! family's [`ChoiceRegistry`], which is where name and tag uniqueness
//! is enforced.

mod registry;


pub use registry::{ChoiceRegistry, Factory, Registries};

use crate::error::ErrorKind;
use serde_cbor::Value as CborValue;
use serde_json::Value as JsonValue;
use std::{any::Any, fmt};
use thiserror::Error as ThisError;

///
/// ChoiceError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ChoiceError {
    #[error("{family} type not set")]
    MissingDiscriminator { family: &'static str },

    #[error("unknown {family} type: {name:?}")]
    UnknownTypeName { family: &'static str, name: String },

    #[error("unknown {family} tag: {tag}")]
    UnknownTag { family: &'static str, tag: u64 },

    #[error("{family} type {name:?} already registered")]
    DuplicateName { family: &'static str, name: String },

    #[error("{family} tag {tag} already registered")]
    DuplicateTag { family: &'static str, tag: u64 },

    #[error("{family} factory for {expected} reports {found}")]
    InconsistentVariant {
        family: &'static str,
        expected: String,
        found: String,
    },

    #[error("no registry for choice family {family}")]
    UnregisteredFamily { family: &'static str },

    #[error("invalid {type_name}: {reason}")]
    InvalidValue {
        type_name: &'static str,
        reason: String,
    },

    #[error("{type_name} expects {expected}, found {found}")]
    UnexpectedInput {
        type_name: &'static str,
        expected: &'static str,
        found: String,
    },
}

impl ChoiceError {
    pub fn invalid(type_name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            type_name,
            reason: reason.into(),
        }
    }

    pub fn unexpected(type_name: &'static str, expected: &'static str, found: impl fmt::Debug) -> Self {
        Self::UnexpectedInput {
            type_name,
            expected,
            found: format!("{found:?}"),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingDiscriminator { .. }
            | Self::UnknownTypeName { .. }
            | Self::UnknownTag { .. }
            | Self::UnregisteredFamily { .. } => ErrorKind::Discriminator,
            Self::DuplicateName { .. }
            | Self::DuplicateTag { .. }
            | Self::InconsistentVariant { .. } => ErrorKind::RegistryConflict,
            Self::InvalidValue { .. } | Self::UnexpectedInput { .. } => ErrorKind::VariantParse,
        }
    }
}

///
/// ChoiceInput
///
/// What a factory is asked to build from. `Empty` is the sentinel used
/// to learn a variant's name and tag without a payload.
///

#[derive(Clone, Copy, Debug)]
pub enum ChoiceInput<'a> {
    Empty,
    Text(&'a str),
    Json(&'a JsonValue),
    Cbor(&'a CborValue),
}

///
/// ChoiceValue
///
/// Behaviour every variant exposes, built-in or registered.
///

pub trait ChoiceValue: ChoiceValueClone + fmt::Debug + fmt::Display + Send + Sync {
    /// Text-form discriminator.
    fn type_name(&self) -> &'static str;

    /// Binary-form discriminator.
    fn tag(&self) -> u64;

    fn validate(&self) -> Result<(), ChoiceError> {
        Ok(())
    }

    /// Canonical byte form of the value.
    fn bytes(&self) -> Vec<u8>;

    /// Binary payload carried under the tag.
    fn cbor_payload(&self) -> Result<CborValue, ChoiceError>;

    /// Text payload carried under `"value"`.
    fn json_value(&self) -> Result<JsonValue, ChoiceError>;
}

///
/// ChoiceValueClone
///
/// Object-safe clone, equality and downcast support for boxed variants.
/// Implemented for every `ChoiceValue + Clone + PartialEq`.
///

pub trait ChoiceValueClone {
    fn clone_box(&self) -> Box<dyn ChoiceValue>;
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn ChoiceValue) -> bool;
}

impl<T> ChoiceValueClone for T
where
    T: ChoiceValue + Clone + PartialEq + 'static,
{
    fn clone_box(&self) -> Box<dyn ChoiceValue> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn ChoiceValue) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|o| o == self)
    }
}

impl Clone for Box<dyn ChoiceValue> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}

impl PartialEq for Box<dyn ChoiceValue> {
    fn eq(&self, other: &Self) -> bool {
        (**self).dyn_eq(&**other)
    }
}

///
/// ParseVariant
///
/// Construction from each input shape. `from_input` is the factory body
/// used at registration: the sentinel yields the default value, every
/// other input is parsed and validated.
///

pub trait ParseVariant: ChoiceValue + Default + Sized {
    fn from_text(text: &str) -> Result<Self, ChoiceError>;

    fn from_cbor(payload: &CborValue) -> Result<Self, ChoiceError>;

    fn from_json(value: &JsonValue) -> Result<Self, ChoiceError> {
        match value {
            JsonValue::String(text) => Self::from_text(text),
            other => Err(ChoiceError::unexpected(
                Self::default().type_name(),
                "string",
                other,
            )),
        }
    }

    fn from_input(input: ChoiceInput<'_>) -> Result<Self, ChoiceError> {
        let value = match input {
            ChoiceInput::Empty => return Ok(Self::default()),
            ChoiceInput::Text(text) => Self::from_text(text)?,
            ChoiceInput::Json(value) => Self::from_json(value)?,
            ChoiceInput::Cbor(payload) => Self::from_cbor(payload)?,
        };
        value.validate()?;

        Ok(value)
    }
}

///
/// TypeChoice
///
/// A choice family: the closed enum of built-in variants plus an
/// extension arm. Each family owns an independent registry namespace
/// keyed by `FAMILY`.
///

pub trait TypeChoice:
    Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync + Sized + 'static
{
    const FAMILY: &'static str;

    /// The held variant.
    fn variant(&self) -> &dyn ChoiceValue;

    /// Wrap a registered third-party variant.
    fn from_extension(value: Box<dyn ChoiceValue>) -> Self;

    fn type_name(&self) -> &'static str {
        self.variant().type_name()
    }

    fn tag(&self) -> u64 {
        self.variant().tag()
    }

    fn bytes(&self) -> Vec<u8> {
        self.variant().bytes()
    }

    /// Borrow the held variant as a concrete type.
    fn downcast_ref<V: 'static>(&self) -> Option<&V> {
        self.variant().as_any().downcast_ref::<V>()
    }
}
