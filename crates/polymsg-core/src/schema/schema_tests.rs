#![allow(non_snake_case)]

use super::*;

const SCHEMA_JSON: &str = r#"{
    "kind": "Document",
    "definitions": [
        {
            "kind": "ObjectTypeDefinition",
            "name": { "kind": "Name", "value": "Query" },
            "fields": [{
                "kind": "FieldDefinition",
                "name": { "kind": "Name", "value": "newAddress" },
                "type": { "kind": "NamedType", "name": { "kind": "Name", "value": "Address" } }
            }]
        },
        {
            "kind": "ObjectTypeDefinition",
            "name": { "kind": "Name", "value": "Mutation" },
            "fields": []
        },
        {
            "kind": "ObjectTypeDefinition",
            "name": { "kind": "Name", "value": "Address" },
            "fields": [{
                "kind": "FieldDefinition",
                "name": { "kind": "Name", "value": "city" },
                "type": {
                    "kind": "NonNullType",
                    "type": { "kind": "NamedType", "name": { "kind": "Name", "value": "String" } }
                },
                "directives": [{
                    "kind": "Directive",
                    "name": { "kind": "Name", "value": "deprecated" },
                    "arguments": []
                }]
            }]
        },
        {
            "kind": "ObjectTypeExtension",
            "name": { "kind": "Name", "value": "Address" },
            "fields": []
        },
        {
            "kind": "EnumTypeDefinition",
            "name": { "kind": "Name", "value": "State" },
            "values": [
                { "kind": "EnumValueDefinition", "name": { "kind": "Name", "value": "CA" } },
                { "kind": "EnumValueDefinition", "name": { "kind": "Name", "value": "NY" } }
            ]
        },
        { "kind": "ScalarTypeDefinition", "name": { "kind": "Name", "value": "ZIPCode" } },
        {
            "kind": "UnionTypeDefinition",
            "name": { "kind": "Name", "value": "Payload" },
            "types": [
                { "kind": "NamedType", "name": { "kind": "Name", "value": "Address" } }
            ]
        }
    ]
}"#;

fn message_json(directives: &str) -> String {
    format!(
        r#"{{
            "kind": "Document",
            "definitions": [{{
                "kind": "OperationDefinition",
                "operation": "query",
                "selectionSet": {{
                    "kind": "SelectionSet",
                    "selections": [{{
                        "kind": "Field",
                        "name": {{ "kind": "Name", "value": "newAddress" }},
                        "directives": [{directives}],
                        "selectionSet": {{
                            "kind": "SelectionSet",
                            "selections": [
                                {{
                                    "kind": "Field",
                                    "name": {{ "kind": "Name", "value": "city" }},
                                    "directives": [{{
                                        "kind": "Directive",
                                        "name": {{ "kind": "Name", "value": "field" }},
                                        "arguments": [
                                            {{
                                                "kind": "Argument",
                                                "name": {{ "kind": "Name", "value": "required" }},
                                                "value": {{ "kind": "BooleanValue", "value": false }}
                                            }},
                                            {{
                                                "kind": "Argument",
                                                "name": {{ "kind": "Name", "value": "order" }},
                                                "value": {{ "kind": "IntValue", "value": "3" }}
                                            }}
                                        ]
                                    }}]
                                }},
                                {{ "kind": "FragmentSpread", "name": {{ "kind": "Name", "value": "Extra" }} }}
                            ]
                        }}
                    }}]
                }}
            }}]
        }}"#
    )
}

fn value_directive(name: &str, value: &str) -> String {
    format!(
        r#"{{
            "kind": "Directive",
            "name": {{ "kind": "Name", "value": "{name}" }},
            "arguments": [{{
                "kind": "Argument",
                "name": {{ "kind": "Name", "value": "value" }},
                "value": {value}
            }}]
        }}"#
    )
}

// ============================================================================
// Schema tests
// ============================================================================

#[test]
fn Schema___from_json___query_fields_become_entry_points() {
    let schema = Schema::from_json(SCHEMA_JSON).unwrap();

    assert_eq!(
        schema.entry_points,
        vec![EntryPoint {
            name: "newAddress".to_string(),
            type_name: "Address".to_string(),
        }]
    );
}

#[test]
fn Schema___from_json___excludes_query_and_mutation_types() {
    let schema = Schema::from_json(SCHEMA_JSON).unwrap();

    let names: Vec<&str> = schema.definitions.iter().map(TypeDefinition::name).collect();

    assert_eq!(names, vec!["Address", "Address", "State", "ZIPCode", "Payload"]);
}

#[test]
fn Schema___from_json___keeps_extension_kind() {
    let schema = Schema::from_json(SCHEMA_JSON).unwrap();

    assert!(!schema.definitions[0].is_extension());
    assert!(schema.definitions[1].is_extension());
}

#[test]
fn Schema___from_json___reads_field_types_and_directives() {
    let schema = Schema::from_json(SCHEMA_JSON).unwrap();

    let TypeDefinition::Object(address) = &schema.definitions[0] else {
        panic!("expected object");
    };
    assert_eq!(address.fields[0].ty, TypeRef::non_null(TypeRef::named("String")));
    assert!(address.fields[0].directives.get("deprecated").is_some());
}

#[test]
fn Schema___from_json___reads_enum_values_and_union_members() {
    let schema = Schema::from_json(SCHEMA_JSON).unwrap();

    assert_eq!(
        schema.definitions[2],
        TypeDefinition::Enum {
            name: "State".to_string(),
            values: vec![EnumValue::new("CA"), EnumValue::new("NY")],
        }
    );
    assert_eq!(
        schema.definitions[4],
        TypeDefinition::Union {
            name: "Payload".to_string(),
            members: vec!["Address".to_string()],
        }
    );
}

#[test]
fn Schema___root_type___undeclared_message_is_error() {
    let schema = Schema::from_json(SCHEMA_JSON).unwrap();

    let result = schema.root_type("oldAddress");

    assert_eq!(
        result,
        Err(ProjectionError::MessageNotDefined("oldAddress".to_string()))
    );
}

#[test]
fn Schema___root_type___declared_message_returns_type_name() {
    let schema = Schema::from_json(SCHEMA_JSON).unwrap();

    assert_eq!(schema.root_type("newAddress"), Ok("Address"));
}

// ============================================================================
// TypeRef tests
// ============================================================================

#[test]
fn TypeRef___name___unwraps_every_wrapper() {
    let ty = TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("State"))));

    assert_eq!(ty.name(), "State");
}

// ============================================================================
// Message tests
// ============================================================================

#[test]
fn Message___from_json___reads_metadata_directives() {
    let directives = [
        value_directive("title", r#"{ "kind": "StringValue", "value": "New address" }"#),
        value_directive("description", r#"{ "kind": "StringValue", "value": "Sent on move" }"#),
        value_directive("namespace", r#"{ "kind": "StringValue", "value": "event.address" }"#),
        value_directive("version", r#"{ "kind": "IntValue", "value": "2" }"#),
    ]
    .join(",");

    let message = Message::from_json(&message_json(&directives), "messages/new-address.json").unwrap();

    assert_eq!(message.name, "newAddress");
    assert_eq!(message.title.as_deref(), Some("New address"));
    assert_eq!(message.description.as_deref(), Some("Sent on move"));
    assert_eq!(message.namespace, "event.address");
    assert_eq!(message.version, 2);
    assert_eq!(message.file_name, PathBuf::from("messages/new-address.json"));
}

#[test]
fn Message___from_json___missing_metadata_uses_defaults() {
    let message = Message::from_json(&message_json(""), "m.json").unwrap();

    assert_eq!(message.title, None);
    assert_eq!(message.namespace, "");
    assert_eq!(message.version, 1);
}

#[test]
fn Message___from_json___zero_version_is_error() {
    let directives = value_directive("version", r#"{ "kind": "IntValue", "value": "0" }"#);

    let result = Message::from_json(&message_json(&directives), "m.json");

    assert!(matches!(
        result,
        Err(DocumentError::InvalidVersion { version: 0, .. })
    ));
}

#[test]
fn Message___from_json___skips_non_field_selections() {
    let message = Message::from_json(&message_json(""), "m.json").unwrap();

    let names: Vec<&str> = message.selections.iter().map(|s| s.name.as_str()).collect();

    assert_eq!(names, vec!["city"]);
}

#[test]
fn Message___from_json___selection_annotations_come_from_first_directive() {
    let message = Message::from_json(&message_json(""), "m.json").unwrap();

    let city = message.selection("city").unwrap();

    assert_eq!(city.required_override(), Some(false));
    assert_eq!(city.annotations().get("order").and_then(DirectiveValue::as_i64), Some(3));
}

#[test]
fn Message___from_json___document_without_query_is_error() {
    let result = Message::from_json(r#"{ "kind": "Document", "definitions": [] }"#, "m.json");

    assert!(matches!(result, Err(DocumentError::NoQueryOperation)));
}

#[test]
fn Selection___required_override___absent_without_directive() {
    let selection = Selection::new("city");

    assert_eq!(selection.required_override(), None);
    assert!(selection.annotations().is_empty());
}

#[test]
fn DirectiveValue___from_int_node___parses_integer() {
    let node = ValueNode::IntValue {
        value: "42".to_string(),
    };

    assert_eq!(DirectiveValue::from(&node), DirectiveValue::Int(42));
}
