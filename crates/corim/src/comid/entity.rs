use crate::{
    points,
    types::{EntityIdentity, IDENTITY_SCHEMA},
};
use corim_core::{
    extension::{AttachError, Hooks},
    prelude::*,
    validate,
};

code_enum! {
    /// What an entity did for the tag.
    pub enum Role = "role" {
        TagCreator = (0, "tagCreator"),
        Creator = (1, "creator"),
        Maintainer = (2, "maintainer"),
    }
}

const ROLES: FieldSpec = FieldSpec::required("roles", 2);

static ENTITY_SCHEMA: EntitySchema = EntitySchema {
    entity: "entity",
    layout: Layout::Map,
    fields: &[ROLES],
    embedded: &[&IDENTITY_SCHEMA],
};

///
/// Entity
///
/// An organisation responsible for the CoMID.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entity {
    pub identity: EntityIdentity,
    pub roles: Vec<Role>,
    pub extensions: ExtensionSlot<Self>,
}

impl Entity {
    #[must_use]
    pub fn new(name: impl Into<String>, roles: impl Into<Vec<Role>>) -> Self {
        Self {
            identity: EntityIdentity::new(name),
            roles: roles.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_reg_id(mut self, reg_id: impl Into<String>) -> Self {
        self.identity = self.identity.with_reg_id(reg_id);
        self
    }
}

impl Extensible for Entity {
    const POINT: ExtensionPoint = points::COMID_ENTITY;

    fn extensions(&self) -> &ExtensionSlot<Self> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionSlot<Self> {
        &mut self.extensions
    }
}

impl Record for Entity {
    fn schema() -> &'static EntitySchema {
        &ENTITY_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.embed(&self.identity, cx)?;
        out.put(&ROLES, &self.roles, cx)?;
        self.extensions.encode_fields(out, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        raw.embed(&mut self.identity, cx)?;
        self.roles = raw.take(&ROLES, cx)?;
        self.extensions.decode_fields(raw, cx)
    }

    fn attach_extensions(&mut self, hooks: Hooks<'_>) -> Result<(), AttachError> {
        hooks.attach(self)
    }
}

corim_core::record_field!(Entity);

impl Validate for Entity {
    fn validate(&self) -> Result<(), ValidateError> {
        self.identity.validate()?;
        validate::non_empty("roles", &self.roles)?;

        self.validate_extensions().map_err(Into::into)
    }
}
