//! Extension points exposed by the document entities.

use corim_core::extension::{ExtensionPoint, Redirect};

pub const COMID: ExtensionPoint = ExtensionPoint::new("comid");
pub const COMID_ENTITY: ExtensionPoint = ExtensionPoint::new("comid.entity");
pub const COMID_TRIPLES: ExtensionPoint = ExtensionPoint::new("comid.triples");
pub const COMID_REFERENCE_VALUE: ExtensionPoint = ExtensionPoint::new("comid.reference-value");
pub const COMID_REFERENCE_VALUE_FLAGS: ExtensionPoint = ExtensionPoint::new("comid.reference-value.flags");
pub const COMID_ENDORSED_VALUE: ExtensionPoint = ExtensionPoint::new("comid.endorsed-value");
pub const COMID_ENDORSED_VALUE_FLAGS: ExtensionPoint = ExtensionPoint::new("comid.endorsed-value.flags");

pub const CORIM: ExtensionPoint = ExtensionPoint::new("corim");
pub const CORIM_ENTITY: ExtensionPoint = ExtensionPoint::new("corim.entity");

/// Points reachable from a CoMID root.
pub const COMID_POINTS: &[ExtensionPoint] = &[
    COMID,
    COMID_ENTITY,
    COMID_TRIPLES,
    COMID_REFERENCE_VALUE,
    COMID_REFERENCE_VALUE_FLAGS,
    COMID_ENDORSED_VALUE,
    COMID_ENDORSED_VALUE_FLAGS,
];

/// Points reachable from an unsigned CoRIM root.
pub const CORIM_POINTS: &[ExtensionPoint] = &[CORIM, CORIM_ENTITY];

// Measurement values and flags default to their reference-value points.
// Under endorsed values they take the endorsed-value ones.
pub const ENDORSED_VALUES: &[Redirect] = &[
    (COMID_REFERENCE_VALUE, COMID_ENDORSED_VALUE),
    (COMID_REFERENCE_VALUE_FLAGS, COMID_ENDORSED_VALUE_FLAGS),
];
