use std::collections::{BTreeMap, HashMap};

use objgraph_canonical::{
    walk, walk_node, Canonicalizer, CanonicalizerConfig, DefaultPolicy, EncodingError, ErrorKind,
    EventKind, FnPolicy, GraphError, Node, Policy, Record, Scalar, StructuralEvent, Value,
};
use serde::Serialize;
use serde_json::json;

fn events_of<T: Serialize + ?Sized>(value: &T, policy: &dyn Policy) -> Vec<StructuralEvent> {
    let mut events = Vec::new();
    walk(value, policy, |event| {
        events.push(event);
        Ok(())
    })
    .unwrap();
    events
}

fn node_events(node: &Node, policy: &dyn Policy) -> Result<Vec<StructuralEvent>, GraphError> {
    let mut events = Vec::new();
    walk_node(node, policy, |event| {
        events.push(event);
        Ok(())
    })?;
    Ok(events)
}

fn kinds(events: &[StructuralEvent]) -> Vec<EventKind> {
    events.iter().map(StructuralEvent::kind).collect()
}

fn texts(events: &[StructuralEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| {
            e.attribute()
                .map(|a| format!("@{a}"))
                .or_else(|| e.value().map(|v| v.text().to_string()))
        })
        .collect()
}

#[test]
fn scalar_emits_single_value() {
    let events = events_of("string", &DefaultPolicy);
    assert_eq!(kinds(&events), [EventKind::Value]);
    assert_eq!(events[0].value().unwrap().datum(), &Scalar::Str("string".into()));
    assert_eq!(events[0].value().unwrap().text(), "\"string\"");
    assert!(events[0].path.is_root());
}

#[test]
fn numbers_and_booleans_are_scalars() {
    let events = events_of(&78u32, &DefaultPolicy);
    assert_eq!(events[0].value().unwrap().datum(), &Scalar::UInt(78));
    let events = events_of(&true, &DefaultPolicy);
    assert_eq!(events[0].value().unwrap().text(), "true");
}

#[test]
fn empty_sequence_has_both_brackets() {
    let events = events_of(&Vec::<i32>::new(), &DefaultPolicy);
    assert_eq!(kinds(&events), [EventKind::ArrayStart, EventKind::ArrayEnd]);
}

#[test]
fn nested_sequences_keep_index_order() {
    let events = events_of(&vec![vec![1, 2], vec![3, 4]], &DefaultPolicy);
    use EventKind::{ArrayEnd, ArrayStart};
    let v = EventKind::Value;
    assert_eq!(
        kinds(&events),
        [ArrayStart, ArrayStart, v, v, ArrayEnd, ArrayStart, v, v, ArrayEnd, ArrayEnd]
    );
    assert_eq!(texts(&events), ["1", "2", "3", "4"]);
}

#[test]
fn empty_record_has_both_brackets() {
    #[derive(Serialize)]
    struct Nothing {}
    let events = events_of(&Nothing {}, &DefaultPolicy);
    assert_eq!(kinds(&events), [EventKind::ObjectStart, EventKind::ObjectEnd]);
}

#[test]
fn record_fields_are_sorted() {
    #[derive(Serialize)]
    struct YX {
        y: i32,
        x: i32,
    }
    let events = events_of(&YX { y: 1, x: 2 }, &DefaultPolicy);
    use EventKind::{Attribute, ObjectEnd, ObjectStart};
    let v = EventKind::Value;
    assert_eq!(
        kinds(&events),
        [ObjectStart, Attribute, v, Attribute, v, ObjectEnd]
    );
    assert_eq!(texts(&events), ["@x", "2", "@y", "1"]);
}

#[test]
fn nested_record_paths() {
    #[derive(Serialize)]
    struct BA {
        b: i32,
        a: i32,
    }
    #[derive(Serialize)]
    struct Wrap {
        y: BA,
    }
    let events = events_of(&Wrap { y: BA { b: 1, a: 2 } }, &DefaultPolicy);
    let paths: Vec<String> = events.iter().map(|e| e.path.segments().join("/")).collect();
    assert_eq!(
        paths,
        ["{", "{/y", "{/y/{", "{/y/{/a", "{/y/{/a", "{/y/{/b", "{/y/{/b", "{/y/}", "}"]
    );
    assert_eq!(texts(&events), ["@y", "@a", "2", "@b", "1"]);
}

#[test]
fn sequence_element_paths_carry_index() {
    let events = events_of(&json!(["a", ["b"]]), &DefaultPolicy);
    let paths: Vec<String> = events.iter().map(|e| e.path.segments().join("/")).collect();
    assert_eq!(paths, ["[", "[/0", "[/1/[", "[/1/[/0", "[/1/]", "]"]);
}

#[test]
fn maps_and_records_with_same_fields_emit_same_events() {
    #[derive(Serialize)]
    struct Pair {
        b: &'static str,
        a: u64,
    }
    let mut map = HashMap::new();
    map.insert("a".to_string(), json!(1));
    map.insert("b".to_string(), json!("two"));

    let from_record = texts(&events_of(&Pair { b: "two", a: 1 }, &DefaultPolicy));
    let from_map = texts(&events_of(&map, &DefaultPolicy));
    assert_eq!(from_record, from_map);
}

#[test]
fn renamed_field_sorts_by_external_name() {
    let record = Record::new("T")
        .field("b", 2i64)
        .renamed_field("zeta", "a", 1i64);
    let events = node_events(&record.into(), &DefaultPolicy).unwrap();
    assert_eq!(texts(&events), ["@a", "1", "@b", "2"]);
}

#[test]
fn serde_rename_is_honoured() {
    #[derive(Serialize)]
    struct Renamed {
        #[serde(rename = "a")]
        zeta: i32,
        b: i32,
    }
    let events = events_of(&Renamed { zeta: 1, b: 2 }, &DefaultPolicy);
    assert_eq!(texts(&events), ["@a", "1", "@b", "2"]);
}

#[test]
fn colliding_keys_keep_declaration_order() {
    let record = Record::new("T")
        .field("a", 1i64)
        .renamed_field("other", "a", 2i64);
    let events = node_events(&record.into(), &DefaultPolicy).unwrap();
    assert_eq!(texts(&events), ["@a", "1", "@a", "2"]);
}

#[test]
fn private_field_aborts_traversal() {
    let record = Record::new("Secretive")
        .field("open", 1i64)
        .private_field("hidden", 2i64);
    let node = Node::Sequence(vec![Node::from("before"), record.into()]);

    let mut seen = 0;
    let err = walk_node(&node, &DefaultPolicy, |_| {
        seen += 1;
        Ok(())
    })
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    match err {
        GraphError::InaccessibleField { record, field, path } => {
            assert_eq!(record, "Secretive");
            assert_eq!(field, "hidden");
            assert_eq!(path, "[.1");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(seen, 2);
}

#[test]
fn non_text_map_keys_are_unsupported() {
    let mut map = BTreeMap::new();
    map.insert(1i32, "one");
    let err = walk(&map, &DefaultPolicy, |_| Ok(())).unwrap_err();
    assert!(matches!(err, GraphError::UnsupportedMapKey { .. }));
}

#[test]
fn non_finite_float_is_an_encoding_error() {
    let node = Node::map([("x", f64::NAN)]);
    let err = node_events(&node, &DefaultPolicy).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert!(matches!(
        err,
        GraphError::Encoding {
            source: EncodingError::NonFiniteNumber(_),
            ..
        }
    ));
}

#[test]
fn emit_error_stops_the_walk() {
    let mut seen = 0;
    let err = walk(&json!([1, 2, 3, 4]), &DefaultPolicy, |_| {
        seen += 1;
        if seen == 2 {
            Err(GraphError::Aborted("enough".into()))
        } else {
            Ok(())
        }
    })
    .unwrap_err();
    assert_eq!(seen, 2);
    assert_eq!(err.kind(), ErrorKind::Aborted);
}

#[test]
fn custom_key_order() {
    let policy = FnPolicy::new().with_key_order(|mut keys| {
        keys.sort();
        keys.reverse();
        keys
    });
    let events = events_of(&json!({"a": 1, "b": 2, "c": 3}), &policy);
    assert_eq!(texts(&events), ["@c", "3", "@b", "2", "@a", "1"]);
}

#[test]
fn key_order_may_drop_but_not_invent_keys() {
    let dropping = FnPolicy::new().with_key_order(|keys| {
        keys.into_iter().filter(|k| k != "secret").collect()
    });
    let events = events_of(&json!({"secret": 1, "b": 2}), &dropping);
    assert_eq!(texts(&events), ["@b", "2"]);

    let inventing = FnPolicy::new().with_key_order(|_| vec!["ghost".to_string()]);
    let err = walk(&json!({"a": 1}), &inventing, |_| Ok(())).unwrap_err();
    assert!(matches!(err, GraphError::UnknownKey { ref key, .. } if key == "ghost"));
}

#[test]
fn sequence_transform_is_applied() {
    let policy = FnPolicy::new().with_sequence_transform(|mut items| {
        items.reverse();
        items
    });
    let events = events_of(&json!([1, 2, 3]), &policy);
    assert_eq!(texts(&events), ["3", "2", "1"]);
}

#[test]
fn value_factory_drives_json_and_hash() {
    let shouting = FnPolicy::new().with_value_factory(|datum| match datum {
        Scalar::Str(s) => {
            let upper = s.to_uppercase();
            Ok(Value::with_forms(
                datum.clone(),
                serde_json::Value::String(upper.clone()).to_string(),
                upper,
            ))
        }
        other => Value::json(other.clone()),
    });
    let shouted = Canonicalizer::with_policy(shouting, CanonicalizerConfig::default())
        .canonicalize(&json!({"k": "abc"}))
        .unwrap();
    let upper = Canonicalizer::new(CanonicalizerConfig::default())
        .canonicalize(&json!({"k": "ABC"}))
        .unwrap();
    assert_eq!(shouted.json, r#"{"k":"ABC"}"#);
    assert_eq!(shouted, upper);
}

#[test]
fn value_factory_failure_reports_path() {
    let refusing = FnPolicy::new()
        .with_value_factory(|_| Err(EncodingError::Custom("no scalars today".into())));
    let err = walk(&json!({"a": [true]}), &refusing, |_| Ok(())).unwrap_err();
    match err {
        GraphError::Encoding { path, source } => {
            assert_eq!(path, "{.a.[.0");
            assert_eq!(source, EncodingError::Custom("no scalars today".into()));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn brackets_balance_on_mixed_input() {
    let value = json!({"a": [{}, [], {"b": [1, {"c": null}]}], "d": {}});
    let mut depth: Vec<EventKind> = Vec::new();
    for event in events_of(&value, &DefaultPolicy) {
        match event.kind() {
            EventKind::ArrayStart | EventKind::ObjectStart => depth.push(event.kind()),
            EventKind::ArrayEnd => assert_eq!(depth.pop(), Some(EventKind::ArrayStart)),
            EventKind::ObjectEnd => assert_eq!(depth.pop(), Some(EventKind::ObjectStart)),
            _ => {}
        }
    }
    assert!(depth.is_empty());
}

#[test]
fn deep_nesting_uses_heap_stack() {
    let mut node = Node::from(0i64);
    for _ in 0..1_000 {
        node = Node::Sequence(vec![node]);
    }
    let events = node_events(&node, &DefaultPolicy).unwrap();
    assert_eq!(events.len(), 2_001);
}
