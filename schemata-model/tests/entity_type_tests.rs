use pretty_assertions::assert_eq;
use schemata_model::{
    AttributeDef, AttributeSpec, EntityType, EnumType, OrderedMap, PrimitiveType, Schema,
    SchemaDefinition, SchemaViolation, TypeSpec,
};
use serde_json::{json, Map, Value};

fn attrs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn schema_with_includes() -> Schema {
    let definition = SchemaDefinition::default()
        .with_include(
            "i1",
            OrderedMap::new().with(
                "foo1",
                AttributeSpec::new(TypeSpec::named("String")).with_default("FOO1"),
            ),
        )
        .with_include(
            "i2",
            OrderedMap::new().with(
                "foo2",
                AttributeSpec::new(TypeSpec::named("String")).with_default("FOO2"),
            ),
        );
    Schema::new(definition).unwrap()
}

fn my_entity(schema: &Schema) -> EntityType {
    EntityType::new(
        "MyEntity",
        schema,
        vec![
            AttributeDef::new("foo", PrimitiveType::String)
                .with_default(json!("FOO"))
                .unwrap(),
            AttributeDef::new("req", PrimitiveType::Integer).required(true),
            AttributeDef::new("e", PrimitiveType::Enum(EnumType::new(["x", "y"]).unwrap())),
        ],
        &[],
        false,
    )
    .unwrap()
}

// ── Own attributes ───────────────────────────────────────────────

#[test]
fn missing_required_attribute_fails() {
    let s = schema_with_includes();
    let e = my_entity(&s);
    let err = e.validate(&Map::new()).unwrap_err();
    assert_eq!(
        err.as_violation(),
        Some(&SchemaViolation::MissingRequired {
            attribute: "req".into(),
            entity_type: Some("MyEntity".into()),
        })
    );
}

#[test]
fn defaults_filled_and_absent_omitted() {
    let s = schema_with_includes();
    let e = my_entity(&s);
    let out = e.validate(&attrs(json!({"req": 42, "e": null}))).unwrap();
    assert_eq!(out, attrs(json!({"foo": "FOO", "req": 42})));
    assert!(!out.contains_key("e"));
}

#[test]
fn values_are_coerced() {
    let s = schema_with_includes();
    let e = my_entity(&s);
    let out = e.validate(&attrs(json!({"req": "7", "e": 1}))).unwrap();
    assert_eq!(out, attrs(json!({"foo": "FOO", "req": 7, "e": "y"})));
}

#[test]
fn coercion_error_names_entity_type_and_attribute() {
    let s = schema_with_includes();
    let e = my_entity(&s);
    let err = e.validate(&attrs(json!({"req": 1, "e": "z"}))).unwrap_err();
    let coercion = err.as_coercion().unwrap();
    assert_eq!(coercion.attribute.as_deref(), Some("e"));
    assert_eq!(coercion.entity_type.as_deref(), Some("MyEntity"));
}

#[test]
fn undeclared_attribute_is_rejected() {
    let s = schema_with_includes();
    let e = my_entity(&s);
    let err = e.validate(&attrs(json!({"req": 1, "bogus": true}))).unwrap_err();
    assert_eq!(
        err.as_violation(),
        Some(&SchemaViolation::UnknownAttribute {
            entity_type: "MyEntity".into(),
            attribute: "bogus".into(),
        })
    );
}

// ── Includes ─────────────────────────────────────────────────────

#[test]
fn includes_contribute_attributes() {
    let s = schema_with_includes();
    let e = EntityType::new(
        "e2",
        &s,
        vec![AttributeDef::new("x", PrimitiveType::Integer)],
        &["i1", "i2"],
        false,
    )
    .unwrap();
    let out = e.validate(&attrs(json!({"x": 1}))).unwrap();
    assert_eq!(out, attrs(json!({"x": 1, "foo1": "FOO1", "foo2": "FOO2"})));
}

#[test]
fn included_attributes_come_first_in_listed_order() {
    let s = schema_with_includes();
    let e = EntityType::new(
        "e2",
        &s,
        vec![AttributeDef::new("x", PrimitiveType::Integer)],
        &["i2", "i1"],
        false,
    )
    .unwrap();
    let names: Vec<&str> = e.attributes().iter().map(|a| a.name()).collect();
    assert_eq!(names, vec!["foo2", "foo1", "x"]);
}

#[test]
fn unknown_include_fails_at_construction() {
    let s = schema_with_includes();
    let err = EntityType::new("e3", &s, vec![], &["nope"], false).unwrap_err();
    assert_eq!(
        err.as_violation(),
        Some(&SchemaViolation::UnknownInclude {
            entity_type: "e3".into(),
            include: "nope".into(),
        })
    );
}

#[test]
fn name_collision_with_include_fails_at_construction() {
    let s = schema_with_includes();
    let err = EntityType::new(
        "e4",
        &s,
        vec![AttributeDef::new("foo1", PrimitiveType::String)],
        &["i1"],
        false,
    )
    .unwrap_err();
    assert_eq!(
        err.as_violation(),
        Some(&SchemaViolation::DuplicateAttribute {
            entity_type: "e4".into(),
            attribute: "foo1".into(),
        })
    );
}

#[test]
fn including_the_same_group_twice_collides() {
    let s = schema_with_includes();
    assert!(EntityType::new("e5", &s, vec![], &["i1", "i1"], false).is_err());
}

#[test]
fn attribute_lookup() {
    let s = schema_with_includes();
    let e = EntityType::new("e6", &s, vec![], &["i1"], true).unwrap();
    assert!(e.is_singleton());
    assert_eq!(e.attribute("foo1").unwrap().default_value(), Some(&json!("FOO1")));
    assert!(e.attribute("foo2").is_none());
}
