use crate::{
    comid::{CryptoKey, Environment, Measurement},
    points,
};
use corim_core::{
    extension::{AttachError, Hooks},
    prelude::*,
    validate,
};

//
// Triple records are positional arrays in the binary form.
//

const ENVIRONMENT: FieldSpec = FieldSpec::required("environment", 0);
const MEASUREMENTS: FieldSpec = FieldSpec::required("measurements", 1);
const VERIFICATION_KEYS: FieldSpec = FieldSpec::required("verification-keys", 1);

static VALUE_TRIPLE_SCHEMA: EntitySchema = EntitySchema {
    entity: "value-triple",
    layout: Layout::Array,
    fields: &[ENVIRONMENT, MEASUREMENTS],
    embedded: &[],
};

static KEY_TRIPLE_SCHEMA: EntitySchema = EntitySchema {
    entity: "key-triple",
    layout: Layout::Array,
    fields: &[ENVIRONMENT, VERIFICATION_KEYS],
    embedded: &[],
};

///
/// ValueTriple
///
/// Reference or endorsed values for one environment.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueTriple {
    pub environment: Environment,
    pub measurements: Vec<Measurement>,
}

impl ValueTriple {
    #[must_use]
    pub fn new(environment: Environment, measurements: impl Into<Vec<Measurement>>) -> Self {
        Self {
            environment,
            measurements: measurements.into(),
        }
    }
}

impl Record for ValueTriple {
    fn schema() -> &'static EntitySchema {
        &VALUE_TRIPLE_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put(&ENVIRONMENT, &self.environment, cx)?;
        out.put(&MEASUREMENTS, &self.measurements, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.environment = raw.take(&ENVIRONMENT, cx)?;
        self.measurements = raw.take(&MEASUREMENTS, cx)?;

        Ok(())
    }

    fn attach_extensions(&mut self, hooks: Hooks<'_>) -> Result<(), AttachError> {
        self.measurements
            .iter_mut()
            .try_for_each(|measurement| measurement.attach_extensions(hooks))
    }
}

impl Validate for ValueTriple {
    fn validate(&self) -> Result<(), ValidateError> {
        validate::field("environment", &self.environment)?;
        validate::non_empty("measurements", &self.measurements)?;
        validate::items("measurement", &self.measurements).map_err(|e| e.in_field("measurements"))
    }
}

///
/// KeyTriple
///
/// Keys an environment signs evidence or identifies itself with.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyTriple {
    pub environment: Environment,
    pub verification_keys: Vec<CryptoKey>,
}

impl KeyTriple {
    #[must_use]
    pub fn new(environment: Environment, keys: impl Into<Vec<CryptoKey>>) -> Self {
        Self {
            environment,
            verification_keys: keys.into(),
        }
    }
}

impl Record for KeyTriple {
    fn schema() -> &'static EntitySchema {
        &KEY_TRIPLE_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put(&ENVIRONMENT, &self.environment, cx)?;
        out.put(&VERIFICATION_KEYS, &self.verification_keys, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.environment = raw.take(&ENVIRONMENT, cx)?;
        self.verification_keys = raw.take(&VERIFICATION_KEYS, cx)?;

        Ok(())
    }
}

impl Validate for KeyTriple {
    fn validate(&self) -> Result<(), ValidateError> {
        validate::field("environment", &self.environment)?;
        validate::non_empty("verification keys", &self.verification_keys)?;
        validate::items("key", &self.verification_keys).map_err(|e| e.in_field("verification-keys"))
    }
}

corim_core::record_field!(ValueTriple, KeyTriple);

const REFERENCE_VALUES: FieldSpec = FieldSpec::optional("reference-values", 0);
const ENDORSED_VALUES: FieldSpec = FieldSpec::optional("endorsed-values", 1);
const DEV_IDENTITY_KEYS: FieldSpec = FieldSpec::optional("dev-identity-keys", 2);
const ATTESTER_VERIFICATION_KEYS: FieldSpec = FieldSpec::optional("attester-verification-keys", 3);

static TRIPLES_SCHEMA: EntitySchema = EntitySchema {
    entity: "triples",
    layout: Layout::Map,
    fields: &[
        REFERENCE_VALUES,
        ENDORSED_VALUES,
        DEV_IDENTITY_KEYS,
        ATTESTER_VERIFICATION_KEYS,
    ],
    embedded: &[],
};

///
/// Triples
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Triples {
    pub reference_values: Vec<ValueTriple>,
    pub endorsed_values: Vec<ValueTriple>,
    pub dev_identity_keys: Vec<KeyTriple>,
    pub attester_verification_keys: Vec<KeyTriple>,
    pub extensions: ExtensionSlot<Self>,
}

impl Triples {
    pub fn add_reference_value(&mut self, triple: ValueTriple) -> &mut Self {
        self.reference_values.push(triple);
        self
    }

    pub fn add_endorsed_value(&mut self, triple: ValueTriple) -> &mut Self {
        self.endorsed_values.push(triple);
        self
    }

    pub fn add_dev_identity_key(&mut self, triple: KeyTriple) -> &mut Self {
        self.dev_identity_keys.push(triple);
        self
    }

    pub fn add_attester_verification_key(&mut self, triple: KeyTriple) -> &mut Self {
        self.attester_verification_keys.push(triple);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reference_values.is_empty()
            && self.endorsed_values.is_empty()
            && self.dev_identity_keys.is_empty()
            && self.attester_verification_keys.is_empty()
    }
}

impl Extensible for Triples {
    const POINT: ExtensionPoint = points::COMID_TRIPLES;

    fn extensions(&self) -> &ExtensionSlot<Self> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionSlot<Self> {
        &mut self.extensions
    }
}

impl Record for Triples {
    fn schema() -> &'static EntitySchema {
        &TRIPLES_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put(&REFERENCE_VALUES, &self.reference_values, cx)?;
        out.put(&ENDORSED_VALUES, &self.endorsed_values, cx)?;
        out.put(&DEV_IDENTITY_KEYS, &self.dev_identity_keys, cx)?;
        out.put(&ATTESTER_VERIFICATION_KEYS, &self.attester_verification_keys, cx)?;

        self.extensions.encode_fields(out, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.reference_values = raw.take_or_default(&REFERENCE_VALUES, cx)?;
        let endorsed = cx.redirect(points::ENDORSED_VALUES);
        self.endorsed_values = raw.take_or_default(&ENDORSED_VALUES, &endorsed)?;
        self.dev_identity_keys = raw.take_or_default(&DEV_IDENTITY_KEYS, cx)?;
        self.attester_verification_keys = raw.take_or_default(&ATTESTER_VERIFICATION_KEYS, cx)?;

        self.extensions.decode_fields(raw, cx)
    }

    fn attach_extensions(&mut self, hooks: Hooks<'_>) -> Result<(), AttachError> {
        hooks.attach(self)?;
        for triple in &mut self.reference_values {
            triple.attach_extensions(hooks)?;
        }
        let endorsed = hooks.redirect(points::ENDORSED_VALUES);
        for triple in &mut self.endorsed_values {
            triple.attach_extensions(endorsed)?;
        }

        Ok(())
    }
}

corim_core::record_field!(Triples);

impl Validate for Triples {
    fn validate(&self) -> Result<(), ValidateError> {
        if self.is_empty() && !self.extensions.has_field_values() {
            return Err(ValidateError::invalid("triples struct must not be empty"));
        }

        validate::items("triple", &self.reference_values).map_err(|e| e.in_field("reference-values"))?;
        validate::items("triple", &self.endorsed_values).map_err(|e| e.in_field("endorsed-values"))?;
        validate::items("triple", &self.dev_identity_keys).map_err(|e| e.in_field("dev-identity-keys"))?;
        validate::items("triple", &self.attester_verification_keys)
            .map_err(|e| e.in_field("attester-verification-keys"))?;

        self.validate_extensions().map_err(Into::into)
    }
}
