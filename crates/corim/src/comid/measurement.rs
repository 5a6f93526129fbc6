use crate::{
    comid::{CryptoKey, FlagsMap, Mkey},
    points,
    types::{Digest, Ueid, Uuid},
};
use corim_core::{
    extension::{AttachError, Hooks},
    prelude::*,
    validate,
};

const DIGESTS: FieldSpec = FieldSpec::optional("digests", 2);
const FLAGS: FieldSpec = FieldSpec::optional("flags", 3);
const RAW_VALUE: FieldSpec = FieldSpec::optional("raw-value", 4);
const SERIAL_NUMBER: FieldSpec = FieldSpec::optional("serial-number", 8);
const UEID: FieldSpec = FieldSpec::optional("ueid", 9);
const UUID: FieldSpec = FieldSpec::optional("uuid", 10);
const NAME: FieldSpec = FieldSpec::optional("name", 11);

static MVAL_SCHEMA: EntitySchema = EntitySchema {
    entity: "measurement-values",
    layout: Layout::Map,
    fields: &[DIGESTS, FLAGS, RAW_VALUE, SERIAL_NUMBER, UEID, UUID, NAME],
    embedded: &[],
};

///
/// Mval
///
/// Measured values of one measurement. A profile hook on
/// `comid.reference-value` or `comid.endorsed-value` can carry further
/// values under its own keys.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mval {
    pub digests: Vec<Digest>,
    pub flags: Option<FlagsMap>,
    pub raw_value: Option<Bytes>,
    pub serial_number: Option<String>,
    pub ueid: Option<Ueid>,
    pub uuid: Option<Uuid>,
    pub name: Option<String>,
    pub extensions: ExtensionSlot<Self>,
}

impl Mval {
    /// True when neither a built-in value nor a hook field holds a value.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.digests.is_empty()
            && !self.flags.as_ref().is_some_and(FlagStore::any_set)
            && self.raw_value.is_none()
            && self.serial_number.is_none()
            && self.ueid.is_none()
            && self.uuid.is_none()
            && self.name.is_none()
            && !self.extensions.has_field_values()
    }
}

impl Extensible for Mval {
    const POINT: ExtensionPoint = points::COMID_REFERENCE_VALUE;

    fn declares(point: ExtensionPoint) -> bool {
        point == points::COMID_REFERENCE_VALUE || point == points::COMID_ENDORSED_VALUE
    }

    fn extensions(&self) -> &ExtensionSlot<Self> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionSlot<Self> {
        &mut self.extensions
    }
}

impl Record for Mval {
    fn schema() -> &'static EntitySchema {
        &MVAL_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put(&DIGESTS, &self.digests, cx)?;
        out.put_opt(&FLAGS, self.flags.as_ref(), cx)?;
        out.put_opt(&RAW_VALUE, self.raw_value.as_ref(), cx)?;
        out.put_opt(&SERIAL_NUMBER, self.serial_number.as_ref(), cx)?;
        out.put_opt(&UEID, self.ueid.as_ref(), cx)?;
        out.put_opt(&UUID, self.uuid.as_ref(), cx)?;
        out.put_opt(&NAME, self.name.as_ref(), cx)?;

        self.extensions.encode_fields(out, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.digests = raw.take_or_default(&DIGESTS, cx)?;
        self.flags = raw.take_opt(&FLAGS, cx)?;
        self.raw_value = raw.take_opt(&RAW_VALUE, cx)?;
        self.serial_number = raw.take_opt(&SERIAL_NUMBER, cx)?;
        self.ueid = raw.take_opt(&UEID, cx)?;
        self.uuid = raw.take_opt(&UUID, cx)?;
        self.name = raw.take_opt(&NAME, cx)?;

        self.extensions.decode_fields(raw, cx)
    }

    fn attach_extensions(&mut self, hooks: Hooks<'_>) -> Result<(), AttachError> {
        hooks.attach(self)?;
        match &mut self.flags {
            Some(flags) => flags.attach_extensions(hooks),
            None => Ok(()),
        }
    }
}

corim_core::record_field!(Mval);

impl Validate for Mval {
    fn validate(&self) -> Result<(), ValidateError> {
        if self.is_unset() {
            return Err(ValidateError::invalid("no measurement value set"));
        }

        validate::items("digest", &self.digests).map_err(|e| e.in_field("digests"))?;
        validate::field_opt("flags", self.flags.as_ref())?;
        if let Some(ueid) = &self.ueid {
            ChoiceValue::validate(ueid).map_err(|e| ValidateError::from(e).in_field("ueid"))?;
        }
        if let Some(uuid) = &self.uuid {
            ChoiceValue::validate(uuid).map_err(|e| ValidateError::from(e).in_field("uuid"))?;
        }

        self.validate_extensions().map_err(Into::into)
    }
}

const MKEY: FieldSpec = FieldSpec::optional("key", 0);
const MVAL: FieldSpec = FieldSpec::required("value", 1);
const AUTHORIZED_BY: FieldSpec = FieldSpec::optional("authorized-by", 2);

static MEASUREMENT_SCHEMA: EntitySchema = EntitySchema {
    entity: "measurement",
    layout: Layout::Map,
    fields: &[MKEY, MVAL, AUTHORIZED_BY],
    embedded: &[],
};

///
/// Measurement
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Measurement {
    pub key: Option<Mkey>,
    pub value: Mval,
    pub authorized_by: Vec<CryptoKey>,
}

impl Measurement {
    #[must_use]
    pub fn new(value: Mval) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<Mkey>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl Record for Measurement {
    fn schema() -> &'static EntitySchema {
        &MEASUREMENT_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put_opt(&MKEY, self.key.as_ref(), cx)?;
        out.put(&MVAL, &self.value, cx)?;
        out.put(&AUTHORIZED_BY, &self.authorized_by, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.key = raw.take_opt(&MKEY, cx)?;
        self.value = raw.take(&MVAL, cx)?;
        self.authorized_by = raw.take_or_default(&AUTHORIZED_BY, cx)?;

        Ok(())
    }

    fn attach_extensions(&mut self, hooks: Hooks<'_>) -> Result<(), AttachError> {
        self.value.attach_extensions(hooks)
    }
}

corim_core::record_field!(Measurement);

impl Validate for Measurement {
    fn validate(&self) -> Result<(), ValidateError> {
        validate::field_opt("key", self.key.as_ref())?;
        validate::field("value", &self.value)?;
        validate::items("key", &self.authorized_by).map_err(|e| e.in_field("authorized-by"))
    }
}
