use crate::types::TagId;
use corim_core::{prelude::*, validate};

const TAG_ID: FieldSpec = FieldSpec::required("id", 0);
const TAG_VERSION: FieldSpec = FieldSpec::optional("version", 1);

static TAG_IDENTITY_SCHEMA: EntitySchema = EntitySchema {
    entity: "tag-identity",
    layout: Layout::Map,
    fields: &[TAG_ID, TAG_VERSION],
    embedded: &[],
};

///
/// TagIdentity
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TagIdentity {
    pub tag_id: TagId,
    pub tag_version: Option<u64>,
}

impl TagIdentity {
    #[must_use]
    pub fn new(tag_id: impl Into<TagId>) -> Self {
        Self {
            tag_id: tag_id.into(),
            tag_version: None,
        }
    }

    #[must_use]
    pub const fn with_version(mut self, version: u64) -> Self {
        self.tag_version = Some(version);
        self
    }
}

impl Record for TagIdentity {
    fn schema() -> &'static EntitySchema {
        &TAG_IDENTITY_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put(&TAG_ID, &self.tag_id, cx)?;
        out.put_opt(&TAG_VERSION, self.tag_version.as_ref(), cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.tag_id = raw.take(&TAG_ID, cx)?;
        self.tag_version = raw.take_opt(&TAG_VERSION, cx)?;

        Ok(())
    }
}

corim_core::record_field!(TagIdentity);

impl Validate for TagIdentity {
    fn validate(&self) -> Result<(), ValidateError> {
        validate::field("id", &self.tag_id)
    }
}
