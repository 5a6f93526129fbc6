use crate::{
    codec::{
        Cbor, CodecError, Context, FieldWriter, Format, Json, RawMap, Record, decode_into,
        decode_record, encode_record, from_bytes_into, peek, to_bytes,
    },
    config::CodecConfig,
    error::ErrorKind,
    model::{EntitySchema, FieldSpec, Layout},
    test_support::{Inner, Label, Marker, Middle, Number, Outer, Widget, registries},
};
use proptest::prelude::*;
use serde_cbor::Value as CborValue;
use serde_json::json;
use std::collections::BTreeMap;

fn sample() -> Outer {
    Outer {
        id: 7,
        name: Some("gadget".into()),
        marker: Some(Marker::Label(Label("blue".into()))),
        children: vec![Widget::new(3)],
        middle: Middle {
            tier: Some(2),
            inner: Inner {
                depth: 5,
                note: None,
            },
        },
    }
}

fn int(value: u64) -> CborValue {
    CborValue::Integer(i128::from(value))
}

fn cbor_map(value: &CborValue) -> &BTreeMap<CborValue, CborValue> {
    match value {
        CborValue::Map(map) => map,
        other => panic!("expected map, found {other:?}"),
    }
}

#[test]
fn embedded_fields_flatten_into_one_cbor_map() {
    let registries = registries();
    let cx = Context::new(&registries);
    let value = encode_record::<Cbor, _>(&sample(), &cx).expect("encode");

    let keys: Vec<_> = cbor_map(&value).keys().cloned().collect();
    assert_eq!(keys, vec![int(0), int(1), int(2), int(3), int(10), int(20)]);
    assert_eq!(
        cbor_map(&value).get(&int(2)),
        Some(&CborValue::Tag(9001, Box::new(CborValue::Text("blue".into()))))
    );
}

#[test]
fn embedded_fields_flatten_into_one_json_object_in_schema_order() {
    let registries = registries();
    let cx = Context::new(&registries);
    let value = encode_record::<Json, _>(&sample(), &cx).expect("encode");

    assert_eq!(
        value,
        json!({
            "id": 7,
            "name": "gadget",
            "marker": {"type": "label", "value": "blue"},
            "children": [{"size": 3}],
            "tier": 2,
            "depth": 5,
        })
    );
    let keys: Vec<_> = value.as_object().expect("object").keys().cloned().collect();
    assert_eq!(keys, ["id", "name", "marker", "children", "tier", "depth"]);
}

#[test]
fn empty_optional_fields_are_omitted() {
    let registries = registries();
    let cx = Context::new(&registries);
    let outer = Outer {
        id: 1,
        name: Some(String::new()),
        ..Outer::default()
    };

    let value = encode_record::<Json, _>(&outer, &cx).expect("encode");
    assert_eq!(value, json!({"id": 1, "depth": 0}));
}

#[test]
fn bytes_round_trip_in_both_formats() {
    let registries = registries();
    let cx = Context::new(&registries);
    let config = CodecConfig::default();
    let outer = sample();

    let binary = to_bytes::<Cbor, _>(&outer, &cx, &config).expect("cbor encode");
    let mut decoded = Outer::default();
    from_bytes_into::<Cbor, _>(&mut decoded, &binary, &cx, &config).expect("cbor decode");
    assert_eq!(decoded, outer);

    let text = to_bytes::<Json, _>(&outer, &cx, &config).expect("json encode");
    let mut decoded = Outer::default();
    from_bytes_into::<Json, _>(&mut decoded, &text, &cx, &config).expect("json decode");
    assert_eq!(decoded, outer);
}

#[test]
fn encoding_is_deterministic() {
    let registries = registries();
    let cx = Context::new(&registries);
    let config = CodecConfig::default();

    let first = to_bytes::<Cbor, _>(&sample(), &cx, &config).expect("encode");
    let second = to_bytes::<Cbor, _>(&sample(), &cx, &config).expect("encode");
    assert_eq!(first, second);
}

#[test]
fn missing_mandatory_field_is_named() {
    let registries = registries();
    let cx = Context::new(&registries);
    let mut value = encode_record::<Cbor, _>(&sample(), &cx).expect("encode");
    if let CborValue::Map(map) = &mut value {
        map.remove(&int(20));
    }

    let err = decode_record::<Cbor, Outer>(value, &cx).expect_err("depth is mandatory");
    assert!(
        matches!(err, CodecError::MissingField { field: "depth", key: 20, .. }),
        "unexpected error: {err:?}"
    );
    assert_eq!(err.to_string(), "missing mandatory field \"depth\" (20)");
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn unclaimed_entries_are_rejected() {
    let registries = registries();
    let cx = Context::new(&registries);
    let value = json!({"id": 1, "depth": 2, "colour": "red"});

    let err = decode_record::<Json, Outer>(value, &cx).expect_err("colour is unknown");
    assert!(
        matches!(&err, CodecError::UnknownFields { entity: "outer", keys } if keys == "colour"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn nested_errors_carry_the_field_path() {
    let registries = registries();
    let cx = Context::new(&registries);
    let value = json!({"id": 1, "depth": 2, "children": [{"size": 1}, {}]});

    let err = decode_record::<Json, Outer>(value, &cx).expect_err("second child lacks size");
    assert_eq!(err.field_path(), vec!["children"]);
    assert!(matches!(
        err.root_cause(),
        CodecError::MissingField { field: "size", .. }
    ));
    assert!(
        err.to_string().starts_with("field \"children\": item 1: "),
        "unexpected error: {err}"
    );
}

#[test]
fn choice_without_discriminator_is_rejected() {
    let registries = registries();
    let cx = Context::new(&registries);

    let err = decode_record::<Json, Outer>(json!({"id": 1, "depth": 2, "marker": {"value": "x"}}), &cx)
        .expect_err("type is missing");
    assert_eq!(err.kind(), ErrorKind::Discriminator);
    assert_eq!(err.field_path(), vec!["marker"]);
    assert_eq!(err.to_string(), "field \"marker\": marker type not set");

    let mut value = encode_record::<Cbor, _>(&sample(), &cx).expect("encode");
    if let CborValue::Map(map) = &mut value {
        map.insert(int(2), CborValue::Text("blue".into()));
    }
    let err = decode_record::<Cbor, Outer>(value, &cx).expect_err("tag is missing");
    assert_eq!(err.kind(), ErrorKind::Discriminator);
}

#[test]
fn unknown_tag_is_a_discriminator_error() {
    let registries = registries();
    let cx = Context::new(&registries);
    let mut value = encode_record::<Cbor, _>(&sample(), &cx).expect("encode");
    if let CborValue::Map(map) = &mut value {
        map.insert(int(2), CborValue::Tag(4242, Box::new(CborValue::Null)));
    }

    let err = decode_record::<Cbor, Outer>(value, &cx).expect_err("4242 is not registered");
    assert_eq!(err.kind(), ErrorKind::Discriminator);
    assert!(err.to_string().contains("4242"), "unexpected error: {err}");
}

#[test]
fn text_keys_are_rejected_in_binary_form() {
    let registries = registries();
    let cx = Context::new(&registries);
    let mut map = BTreeMap::new();
    map.insert(CborValue::Text("id".into()), int(1));

    let err = decode_record::<Cbor, Outer>(CborValue::Map(map), &cx).expect_err("text key");
    assert!(matches!(err, CodecError::UnexpectedType { .. }));
}

#[test]
fn duplicate_keys_in_bytes_are_schema_errors() {
    let registries = registries();
    let cx = Context::new(&registries);
    let mut outer = Outer::default();

    let err = from_bytes_into::<Json, _>(
        &mut outer,
        br#"{"id": 1, "id": 2, "depth": 0}"#,
        &cx,
        &CodecConfig::default(),
    )
    .expect_err("duplicate id");
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn size_limit_applies_before_parsing() {
    let registries = registries();
    let cx = Context::new(&registries);
    let mut outer = Outer::default();
    let config = CodecConfig::default().with_max_input_bytes(8);

    let err = from_bytes_into::<Json, _>(&mut outer, br#"{"id": 1, "depth": 0}"#, &cx, &config)
        .expect_err("input too long");
    assert_eq!(err.kind(), ErrorKind::Serialize);
}

#[test]
fn peek_reads_one_field() {
    let registries = registries();
    let cx = Context::new(&registries);
    let value = encode_record::<Cbor, _>(&sample(), &cx).expect("encode");

    static ID: FieldSpec = FieldSpec::required("id", 0);
    static NOTE: FieldSpec = FieldSpec::optional("note", 21);

    assert_eq!(peek::<Cbor, u64>(&value, &ID, &cx).expect("peek"), Some(7));
    assert_eq!(peek::<Cbor, String>(&value, &NOTE, &cx).expect("peek"), None);
}

#[test]
fn writing_a_key_twice_is_a_collision() {
    const A: FieldSpec = FieldSpec::required("a", 0);
    const B: FieldSpec = FieldSpec::required("b", 0);

    static TWICE_SCHEMA: EntitySchema = EntitySchema {
        entity: "twice",
        layout: Layout::Map,
        fields: &[A, B],
        embedded: &[],
    };

    #[derive(Default)]
    struct Twice;

    impl Record for Twice {
        fn schema() -> &'static EntitySchema {
            &TWICE_SCHEMA
        }

        fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
            out.put(&A, &1u64, cx)?;
            out.put(&B, &2u64, cx)
        }

        fn decode_fields<F: Format>(&mut self, _: &mut RawMap<F>, _: &Context<'_>) -> Result<(), CodecError> {
            Ok(())
        }
    }

    let registries = registries();
    let cx = Context::new(&registries);
    let err = encode_record::<Cbor, _>(&Twice, &cx).expect_err("key 0 written twice");
    assert!(matches!(err, CodecError::KeyCollision { entity: "twice", key: 0, .. }));
}

#[test]
fn array_layout_is_positional_in_binary_and_object_in_text() {
    const FIRST: FieldSpec = FieldSpec::required("first", 0);
    const SECOND: FieldSpec = FieldSpec::required("second", 1);

    static PAIR_SCHEMA: EntitySchema = EntitySchema {
        entity: "pair",
        layout: Layout::Array,
        fields: &[FIRST, SECOND],
        embedded: &[],
    };

    #[derive(Debug, PartialEq)]
    struct Pair {
        first: Marker,
        second: u64,
    }

    impl Default for Pair {
        fn default() -> Self {
            Self {
                first: Marker::Number(Number(0)),
                second: 0,
            }
        }
    }

    impl Record for Pair {
        fn schema() -> &'static EntitySchema {
            &PAIR_SCHEMA
        }

        fn encode_fields<F: Format>(&self, out: &mut FieldWriter<F>, cx: &Context<'_>) -> Result<(), CodecError> {
            out.put(&FIRST, &self.first, cx)?;
            out.put(&SECOND, &self.second, cx)
        }

        fn decode_fields<F: Format>(&mut self, raw: &mut RawMap<F>, cx: &Context<'_>) -> Result<(), CodecError> {
            self.first = raw.take(&FIRST, cx)?;
            self.second = raw.take(&SECOND, cx)?;

            Ok(())
        }
    }

    let registries = registries();
    let cx = Context::new(&registries);
    let pair = Pair {
        first: Marker::Number(Number(9)),
        second: 4,
    };

    let binary = encode_record::<Cbor, _>(&pair, &cx).expect("encode");
    assert_eq!(
        binary,
        CborValue::Array(vec![CborValue::Tag(9002, Box::new(int(9))), int(4)])
    );
    let text = encode_record::<Json, _>(&pair, &cx).expect("encode");
    assert_eq!(text, json!({"first": {"type": "number", "value": "9"}, "second": 4}));

    let mut decoded = Pair::default();
    decode_into::<Cbor, _>(&mut decoded, binary, &cx).expect("decode");
    assert_eq!(decoded, pair);

    let err = decode_record::<Cbor, Pair>(CborValue::Array(vec![CborValue::Tag(9002, Box::new(int(9)))]), &cx)
        .expect_err("second position is mandatory");
    assert!(matches!(err, CodecError::MissingField { field: "second", .. }));
}

fn arb_outer() -> impl Strategy<Value = Outer> {
    (
        any::<u64>(),
        proptest::option::of("[a-z]{0,8}"),
        proptest::option::of(prop_oneof![
            "[a-z]{1,8}".prop_map(|s| Marker::Label(Label(s))),
            any::<u64>().prop_map(|n| Marker::Number(Number(n))),
        ]),
        proptest::collection::vec(1u64..1000, 0..4),
        proptest::option::of(any::<u64>()),
        any::<u64>(),
        proptest::option::of("[a-z ]{1,12}"),
    )
        .prop_map(|(id, name, marker, sizes, tier, depth, note)| Outer {
            id,
            // empty optional strings are omitted on encode and come back as None
            name: name.filter(|n| !n.is_empty()),
            marker,
            children: sizes.into_iter().map(Widget::new).collect(),
            middle: Middle {
                tier,
                inner: Inner { depth, note },
            },
        })
}

proptest! {
    #[test]
    fn records_round_trip_in_both_formats(outer in arb_outer()) {
        let registries = registries();
        let cx = Context::new(&registries);

        let binary = encode_record::<Cbor, _>(&outer, &cx).expect("cbor encode");
        prop_assert_eq!(&decode_record::<Cbor, Outer>(binary, &cx).expect("cbor decode"), &outer);

        let text = encode_record::<Json, _>(&outer, &cx).expect("json encode");
        prop_assert_eq!(&decode_record::<Json, Outer>(text, &cx).expect("json decode"), &outer);
    }
}
