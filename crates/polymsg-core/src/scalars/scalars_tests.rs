#![allow(non_snake_case)]

use super::*;

fn table() -> ScalarTable {
    ScalarTable::new()
        .with_scalar(
            "ZIPCode",
            ScalarDef::new("string").with_pattern("^[0-9]{5}(?:-[0-9]{4})?$"),
        )
        .with_scalar("Any", ScalarDef::new("json.RawMessage"))
        .with_conversion("String", "string")
        .with_conversion("ID", TypeName::Many(vec!["number".into(), "string".into()]))
}

#[test]
fn ScalarTable___convert___mapped_primitive() {
    assert_eq!(table().convert("String"), "string");
}

#[test]
fn ScalarTable___convert___unmapped_name_passes_through() {
    assert_eq!(table().convert("Address"), "Address");
}

#[test]
fn ScalarTable___convert___many_names_are_joined() {
    assert_eq!(table().convert("ID"), "number|string");
}

#[test]
fn ScalarTable___scalar___returns_descriptor() {
    let table = table();

    let zip = table.scalar("ZIPCode").unwrap();

    assert_eq!(zip.ty, TypeName::One("string".to_string()));
    assert_eq!(zip.pattern.as_deref(), Some("^[0-9]{5}(?:-[0-9]{4})?$"));
}

#[test]
fn ScalarTable___merge___overrides_and_extends() {
    let mut table = table();
    let overrides = ScalarTable::new()
        .with_scalar("ZIPCode", ScalarDef::new("PostalCode"))
        .with_scalar("Email", ScalarDef::new("string"));

    table.merge(overrides);

    assert_eq!(
        table.scalar("ZIPCode").unwrap().ty,
        TypeName::One("PostalCode".to_string())
    );
    assert!(table.scalar("Email").is_some());
    let names: Vec<&String> = table.scalars.keys().collect();
    assert_eq!(names, vec!["ZIPCode", "Any", "Email"]);
}

#[test]
fn ScalarTable___validate___accepts_valid_patterns() {
    assert_eq!(table().validate(), Ok(()));
}

#[test]
fn ScalarTable___validate___rejects_invalid_pattern() {
    let table = ScalarTable::new().with_scalar("Broken", ScalarDef::new("string").with_pattern("(["));

    let result = table.validate();

    assert!(matches!(
        result,
        Err(ScalarTableError::InvalidPattern { scalar, .. }) if scalar == "Broken"
    ));
}

#[test]
fn ScalarTable___named_scalars___skips_lowercase_names() {
    let table = table().with_scalar("date", ScalarDef::new("string"));

    let names: Vec<&String> = table.named_scalars().map(|(name, _)| name).collect();

    assert_eq!(names, vec!["ZIPCode", "Any"]);
}

#[test]
fn ScalarTable___deserialize___reads_single_and_many_types() {
    let json = r#"{
        "scalars": {
            "DateTime": { "type": "datetime.datetime", "inputType": "str", "instantiate": "parse" },
            "Any": { "type": ["object", "array"] }
        },
        "converter": { "Int": "int" }
    }"#;

    let table: ScalarTable = serde_json::from_str(json).unwrap();

    let date_time = table.scalar("DateTime").unwrap();
    assert_eq!(date_time.input_type.as_deref(), Some("str"));
    assert_eq!(date_time.instantiate.as_deref(), Some("parse"));
    assert_eq!(table.scalar("Any").unwrap().ty.names(), vec!["object", "array"]);
    assert_eq!(table.convert("Int"), "int");
}
