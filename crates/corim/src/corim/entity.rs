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
    /// What an entity did for the manifest.
    pub enum CorimRole = "corim role" {
        ManifestCreator = (1, "manifestCreator"),
        ManifestSigner = (2, "manifestSigner"),
    }
}

const ROLES: FieldSpec = FieldSpec::required("roles", 2);

static CORIM_ENTITY_SCHEMA: EntitySchema = EntitySchema {
    entity: "corim-entity",
    layout: Layout::Map,
    fields: &[ROLES],
    embedded: &[&IDENTITY_SCHEMA],
};

///
/// CorimEntity
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CorimEntity {
    pub identity: EntityIdentity,
    pub roles: Vec<CorimRole>,
    pub extensions: ExtensionSlot<Self>,
}

impl CorimEntity {
    #[must_use]
    pub fn new(name: impl Into<String>, roles: impl Into<Vec<CorimRole>>) -> Self {
        Self {
            identity: EntityIdentity::new(name),
            roles: roles.into(),
            ..Self::default()
        }
    }
}

impl Extensible for CorimEntity {
    const POINT: ExtensionPoint = points::CORIM_ENTITY;

    fn extensions(&self) -> &ExtensionSlot<Self> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionSlot<Self> {
        &mut self.extensions
    }
}

impl Record for CorimEntity {
    fn schema() -> &'static EntitySchema {
        &CORIM_ENTITY_SCHEMA
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

corim_core::record_field!(CorimEntity);

impl Validate for CorimEntity {
    fn validate(&self) -> Result<(), ValidateError> {
        self.identity.validate()?;
        validate::non_empty("roles", &self.roles)?;

        self.validate_extensions().map_err(Into::into)
    }
}
