use crate::comid::{ClassId, GroupId, InstanceId};
use corim_core::{prelude::*, validate};

const CLASS_ID: FieldSpec = FieldSpec::optional("id", 0);
const VENDOR: FieldSpec = FieldSpec::optional("vendor", 1);
const MODEL: FieldSpec = FieldSpec::optional("model", 2);
const LAYER: FieldSpec = FieldSpec::optional("layer", 3);
const INDEX: FieldSpec = FieldSpec::optional("index", 4);

static CLASS_SCHEMA: EntitySchema = EntitySchema {
    entity: "class",
    layout: Layout::Map,
    fields: &[CLASS_ID, VENDOR, MODEL, LAYER, INDEX],
    embedded: &[],
};

///
/// Class
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Class {
    pub class_id: Option<ClassId>,
    pub vendor: Option<String>,
    pub model: Option<String>,
    pub layer: Option<u64>,
    pub index: Option<u64>,
}

impl Class {
    #[must_use]
    pub fn with_id(mut self, class_id: impl Into<ClassId>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    #[must_use]
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl Record for Class {
    fn schema() -> &'static EntitySchema {
        &CLASS_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put_opt(&CLASS_ID, self.class_id.as_ref(), cx)?;
        out.put_opt(&VENDOR, self.vendor.as_ref(), cx)?;
        out.put_opt(&MODEL, self.model.as_ref(), cx)?;
        out.put_opt(&LAYER, self.layer.as_ref(), cx)?;
        out.put_opt(&INDEX, self.index.as_ref(), cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.class_id = raw.take_opt(&CLASS_ID, cx)?;
        self.vendor = raw.take_opt(&VENDOR, cx)?;
        self.model = raw.take_opt(&MODEL, cx)?;
        self.layer = raw.take_opt(&LAYER, cx)?;
        self.index = raw.take_opt(&INDEX, cx)?;

        Ok(())
    }
}

corim_core::record_field!(Class);

impl Validate for Class {
    fn validate(&self) -> Result<(), ValidateError> {
        if self.class_id.is_none()
            && self.vendor.is_none()
            && self.model.is_none()
            && self.layer.is_none()
            && self.index.is_none()
        {
            return Err(ValidateError::invalid("class must not be empty"));
        }

        validate::field_opt("class-id", self.class_id.as_ref())
    }
}

const CLASS: FieldSpec = FieldSpec::optional("class", 0);
const INSTANCE: FieldSpec = FieldSpec::optional("instance", 1);
const GROUP: FieldSpec = FieldSpec::optional("group", 2);

static ENVIRONMENT_SCHEMA: EntitySchema = EntitySchema {
    entity: "environment",
    layout: Layout::Map,
    fields: &[CLASS, INSTANCE, GROUP],
    embedded: &[],
};

///
/// Environment
///
/// What a triple is about: a class of device, one instance, or a group.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Environment {
    pub class: Option<Class>,
    pub instance: Option<InstanceId>,
    pub group: Option<GroupId>,
}

impl Environment {
    #[must_use]
    pub const fn for_class(class: Class) -> Self {
        Self {
            class: Some(class),
            instance: None,
            group: None,
        }
    }

    #[must_use]
    pub fn for_instance(instance: impl Into<InstanceId>) -> Self {
        Self {
            instance: Some(instance.into()),
            ..Self::default()
        }
    }
}

impl Record for Environment {
    fn schema() -> &'static EntitySchema {
        &ENVIRONMENT_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put_opt(&CLASS, self.class.as_ref(), cx)?;
        out.put_opt(&INSTANCE, self.instance.as_ref(), cx)?;
        out.put_opt(&GROUP, self.group.as_ref(), cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.class = raw.take_opt(&CLASS, cx)?;
        self.instance = raw.take_opt(&INSTANCE, cx)?;
        self.group = raw.take_opt(&GROUP, cx)?;

        Ok(())
    }
}

corim_core::record_field!(Environment);

impl Validate for Environment {
    fn validate(&self) -> Result<(), ValidateError> {
        if self.class.is_none() && self.instance.is_none() && self.group.is_none() {
            return Err(ValidateError::invalid("environment must not be empty"));
        }

        validate::field_opt("class", self.class.as_ref())?;
        validate::field_opt("instance", self.instance.as_ref())?;
        validate::field_opt("group", self.group.as_ref())
    }
}
