//! Concise Module Identifier: reference values, endorsements and keys
//! for the environments of one module.

mod choices;
mod entity;
mod environment;
mod flags;
mod linked_tag;
mod measurement;
mod tag_identity;
mod triples;


pub use choices::{ClassId, CryptoKey, GroupId, InstanceId, Mkey};
pub use entity::{Entity, Role};
pub use environment::{Class, Environment};
pub use flags::FlagsMap;
pub use linked_tag::{LinkedTag, TagRel};
pub use measurement::{Measurement, Mval};
pub use tag_identity::TagIdentity;
pub use triples::{KeyTriple, Triples, ValueTriple};

use crate::{
    points,
    profile::{Root, RootKind},
};
use corim_core::{
    extension::{AttachError, Hooks},
    prelude::*,
    validate,
};

const LANG: FieldSpec = FieldSpec::optional("lang", 0);
const TAG_IDENTITY: FieldSpec = FieldSpec::required("tag-identity", 1);
const ENTITIES: FieldSpec = FieldSpec::optional("entities", 2);
const LINKED_TAGS: FieldSpec = FieldSpec::optional("linked-tags", 3);
const TRIPLES: FieldSpec = FieldSpec::required("triples", 4);

static COMID_SCHEMA: EntitySchema = EntitySchema {
    entity: "comid",
    layout: Layout::Map,
    fields: &[LANG, TAG_IDENTITY, ENTITIES, LINKED_TAGS, TRIPLES],
    embedded: &[],
};

///
/// Comid
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Comid {
    pub language: Option<String>,
    pub tag_identity: TagIdentity,
    pub entities: Vec<Entity>,
    pub linked_tags: Vec<LinkedTag>,
    pub triples: Triples,
    pub extensions: ExtensionSlot<Self>,
}

impl Comid {
    #[must_use]
    pub fn new(tag_identity: TagIdentity) -> Self {
        Self {
            tag_identity,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn add_entity(&mut self, entity: Entity) -> &mut Self {
        self.entities.push(entity);
        self
    }

    pub fn add_linked_tag(&mut self, linked_tag: LinkedTag) -> &mut Self {
        self.linked_tags.push(linked_tag);
        self
    }
}

impl Extensible for Comid {
    const POINT: ExtensionPoint = points::COMID;

    fn extensions(&self) -> &ExtensionSlot<Self> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionSlot<Self> {
        &mut self.extensions
    }
}

impl Root for Comid {
    const KIND: RootKind = RootKind::Comid;
}

impl Record for Comid {
    fn schema() -> &'static EntitySchema {
        &COMID_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put_opt(&LANG, self.language.as_ref(), cx)?;
        out.put(&TAG_IDENTITY, &self.tag_identity, cx)?;
        out.put(&ENTITIES, &self.entities, cx)?;
        out.put(&LINKED_TAGS, &self.linked_tags, cx)?;
        out.put(&TRIPLES, &self.triples, cx)?;

        self.extensions.encode_fields(out, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.language = raw.take_opt(&LANG, cx)?;
        self.tag_identity = raw.take(&TAG_IDENTITY, cx)?;
        self.entities = raw.take_or_default(&ENTITIES, cx)?;
        self.linked_tags = raw.take_or_default(&LINKED_TAGS, cx)?;
        self.triples = raw.take(&TRIPLES, cx)?;

        self.extensions.decode_fields(raw, cx)
    }

    fn attach_extensions(&mut self, hooks: Hooks<'_>) -> Result<(), AttachError> {
        hooks.attach(self)?;
        for entity in &mut self.entities {
            entity.attach_extensions(hooks)?;
        }

        self.triples.attach_extensions(hooks)
    }
}

impl Validate for Comid {
    fn validate(&self) -> Result<(), ValidateError> {
        validate::field("tag-identity", &self.tag_identity)?;
        validate::items("entity", &self.entities).map_err(|e| e.in_field("entities"))?;
        validate::items("linked tag", &self.linked_tags).map_err(|e| e.in_field("linked-tags"))?;
        validate::field("triples", &self.triples)?;

        self.validate_extensions().map_err(Into::into)
    }
}
