use serde_json::{json, Value};
use statekeep_types::{FieldKind, StoredValue};

// ── FieldKind ────────────────────────────────────────────────────

#[test]
fn value_and_map_are_persistable() {
    assert!(FieldKind::Value.is_persistable());
    assert!(FieldKind::Map.is_persistable());
}

#[test]
fn computed_and_action_are_not_persistable() {
    assert!(!FieldKind::Computed.is_persistable());
    assert!(!FieldKind::Action.is_persistable());
}

#[test]
fn field_kind_serialization_roundtrip() {
    for kind in [
        FieldKind::Value,
        FieldKind::Map,
        FieldKind::Computed,
        FieldKind::Action,
    ] {
        let json = serde_json::to_string(&kind).unwrap();
        let parsed: FieldKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, parsed);
    }
}

#[test]
fn field_kind_snake_case_encoding() {
    assert_eq!(
        serde_json::to_string(&FieldKind::Computed).unwrap(),
        "\"computed\""
    );
}

// ── StoredValue ──────────────────────────────────────────────────

#[test]
fn stored_value_text_accessors() {
    let value = StoredValue::Text("{}".to_string());
    assert_eq!(value.as_text(), Some("{}"));
    assert_eq!(value.as_record(), None);
}

#[test]
fn stored_value_record_accessors() {
    let value = StoredValue::Record(json!({"count": 1}));
    assert_eq!(value.as_text(), None);
    assert_eq!(value.as_record(), Some(&json!({"count": 1})));
}

#[test]
fn stored_value_eq() {
    let a = StoredValue::Record(Value::Null);
    let b = StoredValue::Record(Value::Null);
    assert_eq!(a, b);
    assert_ne!(a, StoredValue::Text("null".to_string()));
}
