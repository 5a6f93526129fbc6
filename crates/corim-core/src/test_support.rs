//! Fixture family and records shared by the unit tests.

use crate::{
    choice::{ChoiceError, ChoiceValue, ParseVariant, Registries},
    codec::{CodecError, Context, FieldWriter, Format, RawMap, Record},
    extension::{
        AttachError, Constraint, Extensible, ExtensionError, ExtensionPoint, ExtensionSlot,
        FieldExtension, Flag, FlagStore, Hook, Hooks,
    },
    model::{EntitySchema, FieldSpec, Layout},
    validate::{self, Validate, ValidateError},
};
use serde_cbor::Value as CborValue;
use serde_json::Value as JsonValue;
use std::{collections::BTreeMap, fmt};

///
/// Label
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Label(pub String);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ChoiceValue for Label {
    fn type_name(&self) -> &'static str {
        "label"
    }

    fn tag(&self) -> u64 {
        9001
    }

    fn validate(&self) -> Result<(), ChoiceError> {
        if self.0.is_empty() {
            return Err(ChoiceError::invalid("label", "empty label"));
        }

        Ok(())
    }

    fn bytes(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }

    fn cbor_payload(&self) -> Result<CborValue, ChoiceError> {
        Ok(CborValue::Text(self.0.clone()))
    }

    fn json_value(&self) -> Result<JsonValue, ChoiceError> {
        Ok(JsonValue::String(self.0.clone()))
    }
}

impl ParseVariant for Label {
    fn from_text(text: &str) -> Result<Self, ChoiceError> {
        Ok(Self(text.to_string()))
    }

    fn from_cbor(payload: &CborValue) -> Result<Self, ChoiceError> {
        match payload {
            CborValue::Text(text) => Ok(Self(text.clone())),
            other => Err(ChoiceError::unexpected("label", "text string", other)),
        }
    }
}

///
/// Number
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Number(pub u64);

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ChoiceValue for Number {
    fn type_name(&self) -> &'static str {
        "number"
    }

    fn tag(&self) -> u64 {
        9002
    }

    fn bytes(&self) -> Vec<u8> {
        self.0.to_be_bytes().to_vec()
    }

    fn cbor_payload(&self) -> Result<CborValue, ChoiceError> {
        Ok(CborValue::Integer(i128::from(self.0)))
    }

    fn json_value(&self) -> Result<JsonValue, ChoiceError> {
        Ok(JsonValue::String(self.0.to_string()))
    }
}

impl ParseVariant for Number {
    fn from_text(text: &str) -> Result<Self, ChoiceError> {
        text.parse()
            .map(Self)
            .map_err(|e| ChoiceError::invalid("number", format!("{e}")))
    }

    fn from_cbor(payload: &CborValue) -> Result<Self, ChoiceError> {
        match payload {
            CborValue::Integer(i) => u64::try_from(*i)
                .map(Self)
                .map_err(|_| ChoiceError::invalid("number", "out of range")),
            other => Err(ChoiceError::unexpected("number", "integer", other)),
        }
    }
}

///
/// Color
/// Third-party variant carried in the extension arm.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Color(pub String);

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl ChoiceValue for Color {
    fn type_name(&self) -> &'static str {
        "color"
    }

    fn tag(&self) -> u64 {
        9003
    }

    fn bytes(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }

    fn cbor_payload(&self) -> Result<CborValue, ChoiceError> {
        Ok(CborValue::Text(self.0.clone()))
    }

    fn json_value(&self) -> Result<JsonValue, ChoiceError> {
        Ok(JsonValue::String(self.0.clone()))
    }
}

impl ParseVariant for Color {
    fn from_text(text: &str) -> Result<Self, ChoiceError> {
        Ok(Self(text.trim_start_matches('#').to_string()))
    }

    fn from_cbor(payload: &CborValue) -> Result<Self, ChoiceError> {
        match payload {
            CborValue::Text(text) => Ok(Self(text.clone())),
            other => Err(ChoiceError::unexpected("color", "text string", other)),
        }
    }
}

crate::choice_family! {
    /// Fixture family.
    pub enum Marker = "marker" {
        Label(Label),
        Number(Number),
    }
}

/// Registries with the fixture family's built-ins.
pub fn registries() -> Registries {
    let mut registries = Registries::new();
    let markers = registries
        .family_mut::<Marker>()
        .expect("fixture family should be creatable");
    markers.register_variant::<Label>().expect("label registers");
    markers.register_variant::<Number>().expect("number registers");

    registries
}

//
// Two levels of embedding: Outer -> Middle -> Inner
//

const DEPTH: FieldSpec = FieldSpec::required("depth", 20);
const NOTE: FieldSpec = FieldSpec::optional("note", 21);
const TIER: FieldSpec = FieldSpec::optional("tier", 10);
const ID: FieldSpec = FieldSpec::required("id", 0);
const NAME: FieldSpec = FieldSpec::optional("name", 1);
const MARKER: FieldSpec = FieldSpec::optional("marker", 2);
const CHILDREN: FieldSpec = FieldSpec::optional("children", 3);

static INNER_SCHEMA: EntitySchema = EntitySchema {
    entity: "inner",
    layout: Layout::Map,
    fields: &[DEPTH, NOTE],
    embedded: &[],
};

static MIDDLE_SCHEMA: EntitySchema = EntitySchema {
    entity: "middle",
    layout: Layout::Map,
    fields: &[TIER],
    embedded: &[&INNER_SCHEMA],
};

static OUTER_SCHEMA: EntitySchema = EntitySchema {
    entity: "outer",
    layout: Layout::Map,
    fields: &[ID, NAME, MARKER, CHILDREN],
    embedded: &[&MIDDLE_SCHEMA],
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inner {
    pub depth: u64,
    pub note: Option<String>,
}

impl Record for Inner {
    fn schema() -> &'static EntitySchema {
        &INNER_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put(&DEPTH, &self.depth, cx)?;
        out.put_opt(&NOTE, self.note.as_ref(), cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.depth = raw.take(&DEPTH, cx)?;
        self.note = raw.take_opt(&NOTE, cx)?;

        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Middle {
    pub tier: Option<u64>,
    pub inner: Inner,
}

impl Record for Middle {
    fn schema() -> &'static EntitySchema {
        &MIDDLE_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put_opt(&TIER, self.tier.as_ref(), cx)?;
        out.embed(&self.inner, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.tier = raw.take_opt(&TIER, cx)?;
        raw.embed(&mut self.inner, cx)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outer {
    pub id: u64,
    pub name: Option<String>,
    pub marker: Option<Marker>,
    pub children: Vec<Widget>,
    pub middle: Middle,
}

impl Record for Outer {
    fn schema() -> &'static EntitySchema {
        &OUTER_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put(&ID, &self.id, cx)?;
        out.put_opt(&NAME, self.name.as_ref(), cx)?;
        out.put_opt(&MARKER, self.marker.as_ref(), cx)?;
        out.put(&CHILDREN, &self.children, cx)?;
        out.embed(&self.middle, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.id = raw.take(&ID, cx)?;
        self.name = raw.take_opt(&NAME, cx)?;
        self.marker = raw.take_opt(&MARKER, cx)?;
        self.children = raw.take_or_default(&CHILDREN, cx)?;
        raw.embed(&mut self.middle, cx)
    }
}

//
// Extensible record
//

pub const WIDGET_POINT: ExtensionPoint = ExtensionPoint::new("widget");
pub const SPARE_WIDGET_POINT: ExtensionPoint = ExtensionPoint::new("widget.spare");

const SIZE: FieldSpec = FieldSpec::required("size", 0);

static WIDGET_SCHEMA: EntitySchema = EntitySchema {
    entity: "widget",
    layout: Layout::Map,
    fields: &[SIZE],
    embedded: &[],
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Widget {
    pub size: u64,
    pub extensions: ExtensionSlot<Self>,
}

impl Widget {
    pub fn new(size: u64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }
}

impl Extensible for Widget {
    const POINT: ExtensionPoint = WIDGET_POINT;

    fn declares(point: ExtensionPoint) -> bool {
        point == WIDGET_POINT || point == SPARE_WIDGET_POINT
    }

    fn extensions(&self) -> &ExtensionSlot<Self> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionSlot<Self> {
        &mut self.extensions
    }
}

impl Record for Widget {
    fn schema() -> &'static EntitySchema {
        &WIDGET_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put(&SIZE, &self.size, cx)?;
        self.extensions.encode_fields(out, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.size = raw.take(&SIZE, cx)?;
        self.extensions.decode_fields(raw, cx)
    }

    fn attach_extensions(&mut self, hooks: Hooks<'_>) -> Result<(), AttachError> {
        hooks.attach(self)
    }
}

crate::record_field!(Widget);

impl Validate for Widget {
    fn validate(&self) -> Result<(), ValidateError> {
        if self.size == 0 {
            return Err(ValidateError::invalid("size must be positive"));
        }

        self.validate_extensions().map_err(Into::into)
    }
}

impl Validate for Outer {
    fn validate(&self) -> Result<(), ValidateError> {
        validate::field_opt("marker", self.marker.as_ref())?;
        validate::items("children", &self.children)
    }
}

//
// Hooks
//

const COLOR: FieldSpec = FieldSpec::optional("color", 40);
const SHINY: Flag = Flag(40);

static PAINT_SCHEMA: EntitySchema = EntitySchema {
    entity: "paint",
    layout: Layout::Map,
    fields: &[COLOR],
    embedded: &[],
};

///
/// Paint
/// Hook with every capability: extra field, constraint, one flag.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paint {
    pub color: Option<String>,
    pub flags: BTreeMap<Flag, bool>,
}

impl Record for Paint {
    fn schema() -> &'static EntitySchema {
        &PAINT_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put_opt(&COLOR, self.color.as_ref(), cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.color = raw.take_opt(&COLOR, cx)?;

        Ok(())
    }
}

impl Constraint<Widget> for Paint {
    fn validate(&self, widget: &Widget) -> Result<(), ExtensionError> {
        if self.color.as_deref() == Some("red") && widget.size > 10 {
            return Err(ExtensionError::new("red widgets must be small"));
        }

        Ok(())
    }
}

impl FlagStore for Paint {
    fn any_set(&self) -> bool {
        !self.flags.is_empty()
    }

    fn set_true(&mut self, flag: Flag) {
        if flag == SHINY {
            self.flags.insert(flag, true);
        }
    }

    fn set_false(&mut self, flag: Flag) {
        if flag == SHINY {
            self.flags.insert(flag, false);
        }
    }

    fn clear(&mut self, flag: Flag) {
        self.flags.remove(&flag);
    }

    fn get(&self, flag: Flag) -> Option<bool> {
        self.flags.get(&flag).copied()
    }
}

impl Hook<Widget> for Paint {
    fn constraint(&self) -> Option<&dyn Constraint<Widget>> {
        Some(self)
    }

    fn flags(&self) -> Option<&dyn FlagStore> {
        Some(self)
    }

    fn flags_mut(&mut self) -> Option<&mut dyn FlagStore> {
        Some(self)
    }

    fn fields(&self) -> Option<&dyn FieldExtension> {
        Some(self)
    }

    fn fields_mut(&mut self) -> Option<&mut dyn FieldExtension> {
        Some(self)
    }
}

///
/// Inert
/// Hook that implements no capability.
///

#[derive(Clone, Debug, Default)]
pub struct Inert;

impl Hook<Widget> for Inert {}

