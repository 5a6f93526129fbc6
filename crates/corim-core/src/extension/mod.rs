//! Extension points.
//!
//! An extensible entity owns one [`ExtensionSlot`] holding at most one
//! [`Hook`]. A hook advertises its capabilities through optional
//! accessors; the entity asks for the capability it needs at each call
//! site and skips the call when the hook does not provide it.

mod fields;
mod flags;
mod map;
mod slot;


pub use fields::FieldExtension;
pub use flags::{Flag, FlagStore};
pub use map::{ExtensionMap, HookFactory, Hooks, Redirect};
pub use slot::ExtensionSlot;

use crate::error::ErrorKind;
use derive_more::Display;
use std::any::Any;
use thiserror::Error as ThisError;

///
/// ExtensionPoint
///
/// Name of one hook slot an entity kind exposes.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ExtensionPoint(&'static str);

impl ExtensionPoint {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

///
/// ExtensionError
///
/// Failure reported by a hook. Displayed verbatim.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct ExtensionError {
    message: String,
}

impl ExtensionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

///
/// AttachError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum AttachError {
    #[error("extension point '{0}' already has a hook attached")]
    AlreadyAttached(ExtensionPoint),

    #[error("extension point '{0}' already registered")]
    DuplicatePoint(ExtensionPoint),

    #[error("hook registered at '{0}' does not fit this entity")]
    HookTypeMismatch(ExtensionPoint),

    #[error("extension point '{0}' is not declared by this entity")]
    UndeclaredPoint(ExtensionPoint),
}

impl AttachError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::RegistryConflict
    }
}

///
/// Constraint
///
/// Extra validation run after an entity's own checks have passed.
///

pub trait Constraint<E>: Send + Sync {
    fn validate(&self, entity: &E) -> Result<(), ExtensionError>;
}

///
/// Hook
///
/// Capability set attached to one entity. Every accessor defaults to
/// `None`, so a hook implements only what it needs.
///

pub trait Hook<E: 'static>: HookClone<E> + Send + Sync {
    fn constraint(&self) -> Option<&dyn Constraint<E>> {
        None
    }

    fn flags(&self) -> Option<&dyn FlagStore> {
        None
    }

    fn flags_mut(&mut self) -> Option<&mut dyn FlagStore> {
        None
    }

    fn fields(&self) -> Option<&dyn FieldExtension> {
        None
    }

    fn fields_mut(&mut self) -> Option<&mut dyn FieldExtension> {
        None
    }
}

///
/// HookClone
///
/// Object-safe clone and downcast support for boxed hooks. Implemented
/// for every `Hook + Clone`.
///

pub trait HookClone<E: 'static> {
    fn clone_box(&self) -> Box<dyn Hook<E>>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<E: 'static, H> HookClone<E> for H
where
    H: Hook<E> + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn Hook<E>> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

///
/// Extensible
///
/// An entity kind with an extension point. `POINT` is where its hook is
/// looked up by default; an entity reused in several positions of a
/// document also declares the points it takes in the other positions.
///

pub trait Extensible: Sized + 'static {
    const POINT: ExtensionPoint;

    /// Whether a hook for this entity may be registered at `point`.
    #[must_use]
    fn declares(point: ExtensionPoint) -> bool {
        point == Self::POINT
    }

    fn extensions(&self) -> &ExtensionSlot<Self>;

    fn extensions_mut(&mut self) -> &mut ExtensionSlot<Self>;

    /// Run the attached hook's constraint, if any.
    fn validate_extensions(&self) -> Result<(), ExtensionError> {
        self.extensions().validate(self)
    }
}
