use corim_core::prelude::*;

const NAME: FieldSpec = FieldSpec::required("name", 0);
const REG_ID: FieldSpec = FieldSpec::optional("regid", 1);

pub(crate) static IDENTITY_SCHEMA: EntitySchema = EntitySchema {
    entity: "entity-identity",
    layout: Layout::Map,
    fields: &[NAME, REG_ID],
    embedded: &[],
};

///
/// EntityIdentity
///
/// Name and registration URI shared by every entity map. Embedded, so
/// its fields sit directly in the owning entity's map.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EntityIdentity {
    pub name: String,
    pub reg_id: Option<String>,
}

impl EntityIdentity {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reg_id: None,
        }
    }

    #[must_use]
    pub fn with_reg_id(mut self, reg_id: impl Into<String>) -> Self {
        self.reg_id = Some(reg_id.into());
        self
    }
}

impl Record for EntityIdentity {
    fn schema() -> &'static EntitySchema {
        &IDENTITY_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put(&NAME, &self.name, cx)?;
        out.put_opt(&REG_ID, self.reg_id.as_ref(), cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.name = raw.take(&NAME, cx)?;
        self.reg_id = raw.take_opt(&REG_ID, cx)?;

        Ok(())
    }
}

impl Validate for EntityIdentity {
    fn validate(&self) -> Result<(), ValidateError> {
        if self.name.is_empty() {
            return Err(ValidateError::invalid("empty entity-name"));
        }
        if let Some(reg_id) = &self.reg_id {
            check_absolute_uri(reg_id).map_err(|e| e.in_field("regid"))?;
        }

        Ok(())
    }
}

/// Require `scheme:rest` with an RFC 3986 scheme.
pub(crate) fn check_absolute_uri(uri: &str) -> Result<(), ValidateError> {
    let scheme_ok = uri.split_once(':').is_some_and(|(scheme, rest)| {
        !rest.is_empty()
            && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    });
    if !scheme_ok {
        return Err(ValidateError::invalid(format!("{uri:?} is not an absolute URI")));
    }

    Ok(())
}
