//! CoRIM and CoMID documents on top of `corim-core`.
//!
//! Start from a [`Session`]: it registers the built-in variants, holds
//! profiles, and runs every encode and decode.
//!
//! - [`comid`]: CoMID entities and their choice families
//! - [`corim`]: the unsigned CoRIM manifest
//! - [`types`]: built-in variant payloads
//! - [`profile`]: profiles and the profile registry
//! - [`points`]: extension points exposed by the entities

#[macro_use]
mod macros;

pub mod builtins;
pub mod comid;
pub mod corim;
pub mod error;
pub mod points;
pub mod profile;
pub mod session;
pub mod types;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use error::Error;
pub use session::Session;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error, Session,
        comid::{
            Class, ClassId, Comid, CryptoKey, Entity, Environment, FlagsMap, GroupId, InstanceId, KeyTriple,
            LinkedTag, Measurement, Mkey, Mval, Role, TagIdentity, TagRel, Triples, ValueTriple,
        },
        corim::{ComidTag, ConciseTag, CorimEntity, CorimRole, ProfileId, UnsignedCorim},
        profile::{Profile, ProfileError, ProfileRegistry, Root, RootKind},
        types::{Digest, HashAlg, Oid, TagId, Uuid},
    };
    pub use corim_core::prelude::*;
}
