//! Unsigned Concise Reference Integrity Manifest: the envelope-free
//! manifest that carries CoMID tags.

mod entity;
mod profile_id;
mod tag;


pub use entity::{CorimEntity, CorimRole};
pub use profile_id::{ProfileId, URI_TAG, Uri};
pub use tag::{COMID_TAG, ComidTag, ConciseTag};

use crate::{
    Error, Session,
    comid::Comid,
    points,
    profile::{Root, RootKind},
    types::TagId,
};
use corim_core::{
    codec::peek,
    extension::{AttachError, Hooks},
    prelude::*,
    validate,
};

const ID: FieldSpec = FieldSpec::required("corim-id", 0);
const TAGS: FieldSpec = FieldSpec::required("tags", 1);
const PROFILE: FieldSpec = FieldSpec::optional("profile", 3);
const ENTITIES: FieldSpec = FieldSpec::optional("entities", 5);

static UNSIGNED_CORIM_SCHEMA: EntitySchema = EntitySchema {
    entity: "unsigned-corim",
    layout: Layout::Map,
    fields: &[ID, TAGS, PROFILE, ENTITIES],
    embedded: &[],
};

///
/// UnsignedCorim
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnsignedCorim {
    pub id: TagId,
    pub tags: Vec<ConciseTag>,
    pub profile: Option<ProfileId>,
    pub entities: Vec<CorimEntity>,
    pub extensions: ExtensionSlot<Self>,
}

impl UnsignedCorim {
    #[must_use]
    pub fn new(id: impl Into<TagId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile: ProfileId) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn add_tag(&mut self, tag: impl Into<ConciseTag>) -> &mut Self {
        self.tags.push(tag.into());
        self
    }

    pub fn add_entity(&mut self, entity: CorimEntity) -> &mut Self {
        self.entities.push(entity);
        self
    }

    /// Validate and encode `comid`, then append it as a tag.
    pub fn add_comid(&mut self, session: &Session, comid: &Comid) -> Result<&mut Self, Error> {
        let bytes = session.encode_comid_cbor(comid)?;

        Ok(self.add_tag(ComidTag(bytes)))
    }

    /// Decode every CoMID tag with the hooks of this manifest's profile.
    /// Tags of other kinds are skipped.
    pub fn comids(&self, session: &Session) -> Result<Vec<Comid>, Error> {
        self.tags
            .iter()
            .filter_map(|tag| match tag {
                ConciseTag::Comid(comid) => Some(comid),
                ConciseTag::Extension(_) => None,
            })
            .map(|tag| session.decode_comid_cbor(tag.as_slice(), self.profile.as_ref()))
            .collect()
    }

    /// Read the profile of an undecoded manifest.
    pub fn peek_profile<F: Format>(value: &F::Value, cx: &Context<'_>) -> Result<Option<ProfileId>, CodecError> {
        peek::<F, ProfileId>(value, &PROFILE, cx)
    }
}

impl Extensible for UnsignedCorim {
    const POINT: ExtensionPoint = points::CORIM;

    fn extensions(&self) -> &ExtensionSlot<Self> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionSlot<Self> {
        &mut self.extensions
    }
}

impl Root for UnsignedCorim {
    const KIND: RootKind = RootKind::UnsignedCorim;

    fn set_profile(&mut self, id: &ProfileId) {
        self.profile = Some(id.clone());
    }
}

impl Record for UnsignedCorim {
    fn schema() -> &'static EntitySchema {
        &UNSIGNED_CORIM_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put(&ID, &self.id, cx)?;
        out.put(&TAGS, &self.tags, cx)?;
        out.put_opt(&PROFILE, self.profile.as_ref(), cx)?;
        out.put(&ENTITIES, &self.entities, cx)?;

        self.extensions.encode_fields(out, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.id = raw.take(&ID, cx)?;
        self.tags = raw.take(&TAGS, cx)?;
        self.profile = raw.take_opt(&PROFILE, cx)?;
        self.entities = raw.take_or_default(&ENTITIES, cx)?;

        self.extensions.decode_fields(raw, cx)
    }

    fn attach_extensions(&mut self, hooks: Hooks<'_>) -> Result<(), AttachError> {
        hooks.attach(self)?;
        self.entities
            .iter_mut()
            .try_for_each(|entity| entity.attach_extensions(hooks))
    }
}

impl Validate for UnsignedCorim {
    fn validate(&self) -> Result<(), ValidateError> {
        validate::field("corim-id", &self.id)?;
        validate::non_empty("tags", &self.tags)?;
        validate::items("tag", &self.tags).map_err(|e| e.in_field("tags"))?;
        validate::field_opt("profile", self.profile.as_ref())?;
        validate::items("entity", &self.entities).map_err(|e| e.in_field("entities"))?;

        self.validate_extensions().map_err(Into::into)
    }
}
