//! Registration of the built-in variants of every family.

use crate::{
    comid::{ClassId, CryptoKey, GroupId, InstanceId, Mkey},
    corim::{ComidTag, ConciseTag, ProfileId, Uri},
    types::{CoseKey, ImplId, Oid, PkixCert, PkixCertPath, PkixKey, TaggedBytes, TaggedInt, Thumbprint, Ueid, Uuid},
};
use corim_core::choice::{ChoiceError, Registries};

/// Register the CoMID families' built-ins.
pub fn register_comid_choices(registries: &mut Registries) -> Result<(), ChoiceError> {
    let classes = registries.family_mut::<ClassId>()?;
    classes.register_variant::<Oid>()?;
    classes.register_variant::<Uuid>()?;
    classes.register_variant::<ImplId>()?;
    classes.register_variant::<TaggedInt>()?;

    let instances = registries.family_mut::<InstanceId>()?;
    instances.register_variant::<Ueid>()?;
    instances.register_variant::<Uuid>()?;

    let groups = registries.family_mut::<GroupId>()?;
    groups.register_variant::<Uuid>()?;
    groups.register_variant::<TaggedBytes>()?;

    let mkeys = registries.family_mut::<Mkey>()?;
    mkeys.register_variant::<Uuid>()?;
    mkeys.register_variant::<Oid>()?;

    let keys = registries.family_mut::<CryptoKey>()?;
    keys.register_variant::<PkixKey>()?;
    keys.register_variant::<PkixCert>()?;
    keys.register_variant::<PkixCertPath>()?;
    keys.register_variant::<Thumbprint>()?;
    keys.register_variant::<CoseKey>()?;

    Ok(())
}

/// Register the CoRIM families' built-ins.
pub fn register_corim_choices(registries: &mut Registries) -> Result<(), ChoiceError> {
    let tags = registries.family_mut::<ConciseTag>()?;
    tags.register_variant::<ComidTag>()?;

    let profiles = registries.family_mut::<ProfileId>()?;
    profiles.register_variant::<Uri>()?;
    profiles.register_variant::<Oid>()?;

    Ok(())
}

/// Registries holding every built-in variant.
pub fn registries() -> Result<Registries, ChoiceError> {
    let mut registries = Registries::new();
    register_comid_choices(&mut registries)?;
    register_corim_choices(&mut registries)?;

    Ok(registries)
}
