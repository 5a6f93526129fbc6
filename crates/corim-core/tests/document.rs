use corim_core::{
    choice::Registries,
    codec::{self, Cbor, Json},
    config::CodecConfig,
    extension::{ExtensionMap, FieldExtension, Hooks},
    prelude::*,
};
use serde_cbor::Value as CborValue;
use serde_json::{Value as JsonValue, json};
use std::fmt;

//
// a tiny document: a sensor with an embedded origin, readings in array
// layout and one type-choice field
//

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Serial(String);

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ChoiceValue for Serial {
    fn type_name(&self) -> &'static str {
        "serial"
    }

    fn tag(&self) -> u64 {
        70_000
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

impl ParseVariant for Serial {
    fn from_text(text: &str) -> Result<Self, ChoiceError> {
        Ok(Self(text.to_string()))
    }

    fn from_cbor(payload: &CborValue) -> Result<Self, ChoiceError> {
        match payload {
            CborValue::Text(text) => Ok(Self(text.clone())),
            other => Err(ChoiceError::unexpected("serial", "text string", other)),
        }
    }
}

corim_core::choice_family! {
    pub enum DeviceId = "device id" {
        Serial(Serial),
    }
}

const SITE: FieldSpec = FieldSpec::required("site", 10);
const RACK: FieldSpec = FieldSpec::optional("rack", 11);

static ORIGIN_SCHEMA: EntitySchema = EntitySchema {
    entity: "origin",
    layout: Layout::Map,
    fields: &[SITE, RACK],
    embedded: &[],
};

#[derive(Clone, Debug, Default, PartialEq)]
struct Origin {
    site: String,
    rack: Option<u64>,
}

impl Record for Origin {
    fn schema() -> &'static EntitySchema {
        &ORIGIN_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put(&SITE, &self.site, cx)?;
        out.put_opt(&RACK, self.rack.as_ref(), cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.site = raw.take(&SITE, cx)?;
        self.rack = raw.take_opt(&RACK, cx)?;

        Ok(())
    }
}

const AT: FieldSpec = FieldSpec::required("at", 0);
const MILLIKELVIN: FieldSpec = FieldSpec::required("millikelvin", 1);

static READING_SCHEMA: EntitySchema = EntitySchema {
    entity: "reading",
    layout: Layout::Array,
    fields: &[AT, MILLIKELVIN],
    embedded: &[],
};

#[derive(Clone, Debug, Default, PartialEq)]
struct Reading {
    at: u64,
    millikelvin: u64,
}

impl Record for Reading {
    fn schema() -> &'static EntitySchema {
        &READING_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put(&AT, &self.at, cx)?;
        out.put(&MILLIKELVIN, &self.millikelvin, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.at = raw.take(&AT, cx)?;
        self.millikelvin = raw.take(&MILLIKELVIN, cx)?;

        Ok(())
    }
}

corim_core::record_field!(Reading);

const SENSOR_POINT: ExtensionPoint = ExtensionPoint::new("sensor");
const ID: FieldSpec = FieldSpec::required("id", 0);
const READINGS: FieldSpec = FieldSpec::optional("readings", 1);

static SENSOR_SCHEMA: EntitySchema = EntitySchema {
    entity: "sensor",
    layout: Layout::Map,
    fields: &[ID, READINGS],
    embedded: &[&ORIGIN_SCHEMA],
};

#[derive(Clone, Debug, Default, PartialEq)]
struct Sensor {
    id: Option<DeviceId>,
    readings: Vec<Reading>,
    origin: Origin,
    extensions: ExtensionSlot<Self>,
}

impl Extensible for Sensor {
    const POINT: ExtensionPoint = SENSOR_POINT;

    fn extensions(&self) -> &ExtensionSlot<Self> {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionSlot<Self> {
        &mut self.extensions
    }
}

impl Record for Sensor {
    fn schema() -> &'static EntitySchema {
        &SENSOR_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        if let Some(id) = &self.id {
            out.put(&ID, id, cx)?;
        }
        out.put(&READINGS, &self.readings, cx)?;
        out.embed(&self.origin, cx)?;

        self.extensions.encode_fields(out, cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.id = Some(raw.take(&ID, cx)?);
        self.readings = raw.take_or_default(&READINGS, cx)?;
        raw.embed(&mut self.origin, cx)?;

        self.extensions.decode_fields(raw, cx)
    }

    fn attach_extensions(&mut self, hooks: Hooks<'_>) -> Result<(), corim_core::extension::AttachError> {
        hooks.attach(self)
    }
}

impl Validate for Sensor {
    fn validate(&self) -> Result<(), ValidateError> {
        let Some(id) = &self.id else {
            return Err(ValidateError::invalid("sensor id not set"));
        };
        corim_core::validate::field("id", id)?;

        self.validate_extensions().map_err(Into::into)
    }
}

//
// hook: a calibration field and a range rule
//

const CALIBRATED: FieldSpec = FieldSpec::optional("calibrated", 40);

static CALIBRATION_SCHEMA: EntitySchema = EntitySchema {
    entity: "calibration",
    layout: Layout::Map,
    fields: &[CALIBRATED],
    embedded: &[],
};

#[derive(Clone, Debug, Default, PartialEq)]
struct Calibration {
    calibrated: Option<bool>,
}

impl Record for Calibration {
    fn schema() -> &'static EntitySchema {
        &CALIBRATION_SCHEMA
    }

    fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        out.put_opt(&CALIBRATED, self.calibrated.as_ref(), cx)
    }

    fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
        self.calibrated = raw.take_opt(&CALIBRATED, cx)?;

        Ok(())
    }
}

impl Constraint<Sensor> for Calibration {
    fn validate(&self, sensor: &Sensor) -> Result<(), ExtensionError> {
        if self.calibrated != Some(true) && !sensor.readings.is_empty() {
            return Err(ExtensionError::new("readings from an uncalibrated sensor"));
        }

        Ok(())
    }
}

impl Hook<Sensor> for Calibration {
    fn constraint(&self) -> Option<&dyn Constraint<Sensor>> {
        Some(self)
    }

    fn fields(&self) -> Option<&dyn FieldExtension> {
        Some(self)
    }

    fn fields_mut(&mut self) -> Option<&mut dyn FieldExtension> {
        Some(self)
    }
}

//
// fixtures
//

fn registries() -> Registries {
    let mut registries = Registries::new();
    registries
        .family_mut::<DeviceId>()
        .expect("family")
        .register_variant::<Serial>()
        .expect("serial registers");

    registries
}

fn sensor() -> Sensor {
    Sensor {
        id: Some(DeviceId::from(Serial("TMP-7".into()))),
        readings: vec![Reading {
            at: 1_700_000_000,
            millikelvin: 293_150,
        }],
        origin: Origin {
            site: "lab-2".into(),
            rack: Some(4),
        },
        extensions: ExtensionSlot::new(),
    }
}

fn calibrated_sensor() -> Sensor {
    let mut sensor = sensor();
    sensor
        .extensions
        .attach(Box::new(Calibration { calibrated: Some(true) }))
        .expect("fresh sensor");

    sensor
}

//
// tests
//

#[test]
fn schema_is_consistent() {
    SENSOR_SCHEMA.check().expect("no collisions");

    let names: Vec<&str> = SENSOR_SCHEMA.flattened().iter().map(|f| f.name).collect();
    assert_eq!(names, ["id", "readings", "site", "rack"]);
    assert_eq!(SENSOR_SCHEMA.field_by_key(10).map(|f| f.name), Some("site"));
}

#[test]
fn both_forms_round_trip_through_bytes() {
    let registries = registries();
    let cx = Context::new(&registries);
    let config = CodecConfig::default();
    let sensor = sensor();

    let bytes = codec::to_bytes::<Cbor, _>(&sensor, &cx, &config).expect("encode");
    let mut decoded = Sensor::default();
    codec::from_bytes_into::<Cbor, _>(&mut decoded, &bytes, &cx, &config).expect("decode");
    assert_eq!(decoded, sensor);
    assert_eq!(bytes, codec::to_bytes::<Cbor, _>(&decoded, &cx, &config).expect("re-encode"));

    let bytes = codec::to_bytes::<Json, _>(&sensor, &cx, &config).expect("encode");
    let text: JsonValue = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(
        text,
        json!({
            "id": {"type": "serial", "value": "TMP-7"},
            "readings": [{"at": 1_700_000_000, "millikelvin": 293_150}],
            "site": "lab-2",
            "rack": 4,
        })
    );

    let mut decoded = Sensor::default();
    codec::from_bytes_into::<Json, _>(&mut decoded, &bytes, &cx, &config).expect("decode");
    assert_eq!(decoded, sensor);
}

#[test]
fn binary_form_uses_integer_keys_and_positional_readings() {
    let registries = registries();
    let cx = Context::new(&registries);

    let value = codec::encode_record::<Cbor, _>(&sensor(), &cx).expect("encode");
    let CborValue::Map(map) = value else {
        panic!("sensor encodes as a map");
    };
    let keys: Vec<&CborValue> = map.keys().collect();
    assert_eq!(
        keys,
        [
            &CborValue::Integer(0),
            &CborValue::Integer(1),
            &CborValue::Integer(10),
            &CborValue::Integer(11)
        ]
    );
    assert_eq!(
        map.get(&CborValue::Integer(1)),
        Some(&CborValue::Array(vec![CborValue::Array(vec![
            CborValue::Integer(1_700_000_000),
            CborValue::Integer(293_150),
        ])]))
    );
    assert_eq!(
        map.get(&CborValue::Integer(0)),
        Some(&CborValue::Tag(70_000, Box::new(CborValue::Text("TMP-7".into()))))
    );
}

#[test]
fn missing_embedded_field_is_named() {
    let registries = registries();
    let cx = Context::new(&registries);
    let text = json!({"id": {"type": "serial", "value": "TMP-7"}});

    let err = codec::decode_record::<Json, Sensor>(text, &cx).expect_err("site missing");
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert_eq!(err.to_string(), "missing mandatory field \"site\" (10)");
}

#[test]
fn duplicate_keys_are_rejected_before_decoding() {
    let registries = registries();
    let cx = Context::new(&registries);
    let bytes = br#"{"id": {"type": "serial", "value": "A"}, "site": "x", "site": "y"}"#;

    let mut sensor = Sensor::default();
    let err = codec::from_bytes_into::<Json, _>(&mut sensor, bytes, &cx, &CodecConfig::default())
        .expect_err("duplicate key");
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn unknown_discriminator_is_reported() {
    let registries = registries();
    let cx = Context::new(&registries);
    let text = json!({"id": {"type": "mac", "value": "00:11"}, "site": "lab"});

    let err = codec::decode_record::<Json, Sensor>(text, &cx).expect_err("unknown type");
    assert_eq!(err.kind(), ErrorKind::Discriminator);
    assert_eq!(err.field_path(), ["id"]);
}

#[test]
fn hook_fields_need_the_hook_on_decode() {
    let registries = registries();
    let extensions = ExtensionMap::new()
        .with_default::<Sensor, Calibration>()
        .expect("sensor point");
    let plain = Context::new(&registries);
    let hooked = Context::new(&registries).with_extensions(Some(&extensions));

    let value = codec::encode_record::<Json, _>(&calibrated_sensor(), &plain).expect("encode");
    assert_eq!(value["calibrated"], json!(true));

    let decoded = codec::decode_record::<Json, Sensor>(value.clone(), &hooked).expect("decode");
    assert_eq!(
        decoded.extensions.hook::<Calibration>(),
        Some(&Calibration { calibrated: Some(true) })
    );
    assert_eq!(decoded, calibrated_sensor());

    let err = codec::decode_record::<Json, Sensor>(value, &plain).expect_err("calibrated is unknown");
    assert_eq!(err.to_string(), "sensor: unexpected fields [calibrated]");
}

#[test]
fn hook_rule_runs_after_built_in_checks() {
    calibrated_sensor().validate().expect("calibrated");

    let mut sensor = sensor();
    sensor
        .extensions
        .attach(Box::new(Calibration::default()))
        .expect("fresh sensor");
    let err = sensor.validate().expect_err("uncalibrated");
    assert_eq!(err.kind(), ErrorKind::Extension);
    assert_eq!(err.to_string(), "readings from an uncalibrated sensor");

    sensor.id = None;
    assert_eq!(sensor.validate(), Err(ValidateError::invalid("sensor id not set")));
}
