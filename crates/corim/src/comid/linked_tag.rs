use crate::types::TagId;
use corim_core::{prelude::*, validate};

code_enum! {
    /// How the linking tag relates to the linked one.
    pub enum TagRel = "tag relation" {
        Supplements = (0, "supplements"),
        Replaces = (1, "replaces"),
    }
}

impl Default for TagRel {
    fn default() -> Self {
        Self::Supplements
    }
}

const TARGET: FieldSpec = FieldSpec::required("target", 0);
const REL: FieldSpec = FieldSpec::required("rel", 1);

static LINKED_TAG_SCHEMA: EntitySchema = EntitySchema {
    entity: "linked-tag",
    layout: Layout::Map,
    fields: &[TARGET, REL],
    embedded: &[],
};

///
/// LinkedTag
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LinkedTag {
    pub target: TagId,
    pub rel: TagRel,
}

impl LinkedTag {
    #[must_use]
    pub fn new(target: impl Into<TagId>, rel: TagRel) -> Self {
        Self {
            target: target.into(),
            rel,
        }
    }
}

impl Record for LinkedTag {
    fn schema() -> &'static EntitySchema {
        &LINKED_TAG_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put(&TARGET, &self.target, cx)?;
        out.put(&REL, &self.rel, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.target = raw.take(&TARGET, cx)?;
        self.rel = raw.take(&REL, cx)?;

        Ok(())
    }
}

corim_core::record_field!(LinkedTag);

impl Validate for LinkedTag {
    fn validate(&self) -> Result<(), ValidateError> {
        validate::field("target", &self.target)?;
        if let TagRel::Other(code) = self.rel {
            return Err(ValidateError::invalid(format!("unknown tag relation {code}")).in_field("rel"));
        }

        Ok(())
    }
}
