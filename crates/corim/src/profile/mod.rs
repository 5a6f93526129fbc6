//! Profiles: named bundles of extension hooks.
//!
//! A profile is registered once, before documents are decoded. Roots
//! built for a profile get the profile's hooks for every point they
//! hold; entities created while decoding pick up theirs from the decode
//! context.

mod registry;


pub use registry::ProfileRegistry;

use crate::{corim::ProfileId, points};
use corim_core::{
    codec::Record,
    error::ErrorKind,
    extension::{Extensible, ExtensionMap, ExtensionPoint, Hooks},
};
use derive_more::Display;
use thiserror::Error as ThisError;

///
/// ProfileError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ProfileError {
    #[error("profile with id {id:?} already registered")]
    DuplicateProfile { id: String },

    #[error("profile {id:?}: unexpected extension point: {point:?}")]
    UnexpectedPoint { id: String, point: &'static str },

    #[error("profile {id:?} not found")]
    NotFound { id: String },
}

impl ProfileError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateProfile { .. } | Self::UnexpectedPoint { .. } => ErrorKind::RegistryConflict,
            Self::NotFound { .. } => ErrorKind::Discriminator,
        }
    }
}

///
/// RootKind
///
/// Document roots a profile can be applied to.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum RootKind {
    #[display("comid")]
    Comid,
    #[display("unsigned-corim")]
    UnsignedCorim,
}

impl RootKind {
    pub const ALL: [Self; 2] = [Self::Comid, Self::UnsignedCorim];

    /// Extension points reachable from this root.
    #[must_use]
    pub const fn points(self) -> &'static [ExtensionPoint] {
        match self {
            Self::Comid => points::COMID_POINTS,
            Self::UnsignedCorim => points::CORIM_POINTS,
        }
    }

    /// Whether any root kind declares `point`.
    #[must_use]
    pub fn is_known(point: ExtensionPoint) -> bool {
        Self::ALL.iter().any(|kind| kind.points().contains(&point))
    }
}

///
/// Root
///
/// A document root that can be built for a profile.
///

pub trait Root: Record + Extensible {
    const KIND: RootKind;

    /// Record the profile the root was built for. Roots without a
    /// profile field ignore it.
    fn set_profile(&mut self, _id: &ProfileId) {}
}

///
/// Profile
///

#[derive(Clone, Debug)]
pub struct Profile {
    id: ProfileId,
    extensions: ExtensionMap,
}

impl Profile {
    /// Bundle `extensions` under `id`, rejecting points no root declares.
    pub fn new(id: ProfileId, extensions: ExtensionMap) -> Result<Self, ProfileError> {
        if let Some(point) = extensions.points().find(|point| !RootKind::is_known(*point)) {
            return Err(ProfileError::UnexpectedPoint {
                id: id.to_string(),
                point: point.as_str(),
            });
        }

        Ok(Self { id, extensions })
    }

    #[must_use]
    pub const fn id(&self) -> &ProfileId {
        &self.id
    }

    #[must_use]
    pub const fn extensions(&self) -> &ExtensionMap {
        &self.extensions
    }

    #[must_use]
    pub const fn hooks(&self) -> Hooks<'_> {
        Hooks::new(&self.extensions)
    }
}
