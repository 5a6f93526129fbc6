//! Documents and hooks shared by the unit tests.

use crate::{
    comid::{
        Class, Comid, CryptoKey, Entity, Environment, FlagsMap, KeyTriple, LinkedTag, Measurement, Mval, Role,
        TagIdentity, TagRel, Triples, ValueTriple,
    },
    types::{Digest, HashAlg, Oid, PkixKey, TagId, Ueid, Uuid},
};
use corim_core::{
    codec::{CodecError, Context, FieldWriter, Format, RawMap, Record},
    extension::{Constraint, ExtensionError, FieldExtension, Hook},
    model::{EntitySchema, FieldSpec, Layout},
};

pub const COMID_ID: &str = "31fb5abf-023e-4992-aa4e-95f9c1503bfa";

pub const KEY: &str = "-----BEGIN PUBLIC KEY-----\n\
    MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEW1BvqF+/ry8BWa7ZEMU1xYYHEQ8B\n\
    lLT4MFHOaO+ICTtIvrEeEpr/sfTAP66H2hCHdb5HEXKtRKod6QLcOLPA1Q==\n\
    -----END PUBLIC KEY-----\n";

/// A CoMID using one entity, one linked tag, one reference value and one
/// attester key.
pub fn sample_comid() -> Comid {
    let id = Uuid::parse(COMID_ID).expect("fixture uuid parses");
    let mut comid = Comid::new(TagIdentity::new(id).with_version(1)).with_language("en-GB");

    comid.add_entity(
        Entity::new("ACME Ltd.", [Role::TagCreator, Role::Creator]).with_reg_id("https://acme.example"),
    );
    comid.add_linked_tag(LinkedTag::new(TagId::text("acme-base"), TagRel::Supplements));

    let class = Class::default()
        .with_id("1.2.3.4".parse::<Oid>().expect("fixture oid parses"))
        .with_vendor("ACME")
        .with_model("RoadRunner");
    let mval = Mval {
        digests: vec![Digest::new(HashAlg::Sha256_32, [0xde, 0xad, 0xbe, 0xef]).expect("fixture digest")],
        flags: Some(FlagsMap::default().with(FlagsMap::IS_DEBUG, false)),
        serial_number: Some("C02X12345".to_string()),
        ..Mval::default()
    };
    let measurement = Measurement::new(mval).with_key(id);
    comid
        .triples
        .add_reference_value(ValueTriple::new(Environment::for_class(class), [measurement]));

    let instance = Ueid::new([0x02, 0xde, 0xad, 0xbe, 0xef, 0xca, 0xfe]).expect("fixture ueid");
    let key = CryptoKey::from(PkixKey::new(KEY).expect("fixture key"));
    comid
        .triples
        .add_attester_verification_key(KeyTriple::new(Environment::for_instance(instance), [key]));

    comid
}

///
/// Deny
/// Hook whose constraint rejects every entity it is attached to.
///

#[derive(Clone, Debug, Default)]
pub struct Deny;

impl Constraint<Entity> for Deny {
    fn validate(&self, _: &Entity) -> Result<(), ExtensionError> {
        Err(ExtensionError::new("entity denied"))
    }
}

impl Constraint<Comid> for Deny {
    fn validate(&self, _: &Comid) -> Result<(), ExtensionError> {
        Err(ExtensionError::new("comid denied"))
    }
}

impl Hook<Entity> for Deny {
    fn constraint(&self) -> Option<&dyn Constraint<Entity>> {
        Some(self)
    }
}

impl Hook<Comid> for Deny {
    fn constraint(&self) -> Option<&dyn Constraint<Comid>> {
        Some(self)
    }
}

///
/// Inert
/// Hook that implements no capability.
///

#[derive(Clone, Debug, Default)]
pub struct Inert;

impl Hook<Mval> for Inert {}

impl Hook<Triples> for Inert {}

impl Hook<Comid> for Inert {}

const NOTE: FieldSpec = FieldSpec::optional("note", 99);

static NOTE_SCHEMA: EntitySchema = EntitySchema {
    entity: "note",
    layout: Layout::Map,
    fields: &[NOTE],
    embedded: &[],
};

///
/// Note
/// Hook carrying one optional text field.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Note(pub Option<String>);

impl Record for Note {
    fn schema() -> &'static EntitySchema {
        &NOTE_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put_opt(&NOTE, self.0.as_ref(), cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.0 = raw.take_opt(&NOTE, cx)?;

        Ok(())
    }
}

impl Hook<Mval> for Note {
    fn fields(&self) -> Option<&dyn FieldExtension> {
        Some(self)
    }

    fn fields_mut(&mut self) -> Option<&mut dyn FieldExtension> {
        Some(self)
    }
}

impl Hook<Triples> for Note {
    fn fields(&self) -> Option<&dyn FieldExtension> {
        Some(self)
    }

    fn fields_mut(&mut self) -> Option<&mut dyn FieldExtension> {
        Some(self)
    }
}
