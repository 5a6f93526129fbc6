//! Extensible schema codec for attestation documents.
//!
//! `corim-core` knows nothing about any particular document. It provides
//! the machinery documents are built from:
//!
//! - [`model`]: static field tables per entity
//! - [`codec`]: the field codec over the binary and text wire forms
//! - [`choice`]: type-choice families and their registries
//! - [`extension`]: hook slots, capabilities and hook maps
//! - [`validate`]: field-path validation errors
//! - [`serialize`]: bounded, duplicate-key-strict backends

#[macro_use]
mod macros;

pub mod choice;
pub mod codec;
pub mod config;
pub mod error;
pub mod extension;
pub mod model;
pub mod serialize;
pub mod validate;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        choice::{ChoiceError, ChoiceInput, ChoiceValue, ParseVariant, TypeChoice},
        codec::{Bytes, CodecError, Context, FieldValue, FieldWriter, Format, RawMap, Record},
        error::ErrorKind,
        extension::{
            Constraint, Extensible, ExtensionError, ExtensionPoint, ExtensionSlot, Flag, FlagStore,
            Hook,
        },
        model::{EntitySchema, FieldSpec, Layout},
        validate::{Validate, ValidateError},
    };
}
