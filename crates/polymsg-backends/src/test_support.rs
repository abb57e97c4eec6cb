//! Shared schema and messages for backend tests

use polymsg_core::schema::{
    Arguments, DirectiveValue, EntryPoint, EnumValue, FieldDefinition, ObjectType, Schema,
    Selection, TypeDefinition, TypeRef,
};
use polymsg_core::{Message, ProjectionResult};
use polymsg_core::{Backend, FileDescriptor, output::generated_code};
use std::path::{Path, PathBuf};

pub(crate) const MESSAGE_DIR: &str = "messages";

fn field_args(order: i64, required: Option<bool>) -> Arguments {
    let mut args = Arguments::new();
    if let Some(required) = required {
        args.insert("required".to_string(), DirectiveValue::Bool(required));
    }
    args.insert("order".to_string(), DirectiveValue::Int(order));
    args
}

fn field(name: &str, order: i64) -> Selection {
    Selection::new(name).with_directive("field", field_args(order, None))
}

/// Address, Location, State and ZIPCode, reachable from `newAddress` and `newLocation`
pub(crate) fn address_schema() -> Schema {
    Schema::new(
        vec![
            TypeDefinition::Object(ObjectType::new(
                "Address",
                vec![
                    FieldDefinition::new("id", TypeRef::non_null(TypeRef::named("ID"))),
                    FieldDefinition::new("street", TypeRef::list(TypeRef::named("String"))),
                    FieldDefinition::new("city", TypeRef::named("String")),
                    FieldDefinition::new("state", TypeRef::named("State")),
                    FieldDefinition::new("zip", TypeRef::named("ZIPCode")),
                    FieldDefinition::new("location", TypeRef::named("Location")),
                ],
            )),
            TypeDefinition::Object(ObjectType::new(
                "Location",
                vec![
                    FieldDefinition::new("lat", TypeRef::non_null(TypeRef::named("Float"))),
                    FieldDefinition::new("lng", TypeRef::non_null(TypeRef::named("Float"))),
                ],
            )),
            TypeDefinition::Enum {
                name: "State".to_string(),
                values: vec![EnumValue::new("CA"), EnumValue::new("NY"), EnumValue::new("TX")],
            },
            TypeDefinition::Scalar {
                name: "ZIPCode".to_string(),
            },
        ],
        vec![
            EntryPoint {
                name: "newAddress".to_string(),
                type_name: "Address".to_string(),
            },
            EntryPoint {
                name: "newLocation".to_string(),
                type_name: "Address".to_string(),
            },
        ],
    )
}

/// `newAddress { street city(required) state zip }`, ordered 1 to 4
pub(crate) fn new_address() -> Message {
    let mut message = Message::new(
        "newAddress",
        vec![
            field("street", 1),
            Selection::new("city").with_directive("field", field_args(2, Some(true))),
            field("state", 3),
            field("zip", 4),
        ],
    );
    message.title = Some("New Address".to_string());
    message.description = Some("A new postal address".to_string());
    message.namespace = "address".to_string();
    message.file_name = PathBuf::from("messages/address/new-address.json");
    message
}

/// `newLocation { id location { lat lng } state }`, version 2
pub(crate) fn new_location() -> Message {
    let mut message = Message::new(
        "newLocation",
        vec![
            field("id", 1),
            field("location", 2).with_selections(vec![field("lat", 1), field("lng", 2)]),
            field("state", 3),
        ],
    );
    message.title = Some("New Location".to_string());
    message.namespace = "address.geo".to_string();
    message.version = 2;
    message.file_name = PathBuf::from("messages/address/new-location.json");
    message
}

/// Generate `messages` and wrap them into file descriptors, then post-process
pub(crate) fn generate_files(
    backend: &dyn Backend,
    messages: &[Message],
) -> ProjectionResult<Vec<FileDescriptor>> {
    let schema = address_schema();
    let mut files = Vec::new();
    for message in messages {
        let generated = backend.generate(message, &schema)?;
        files.extend(generated_code(message, backend, generated));
    }
    backend.post_process(&mut files, Path::new(MESSAGE_DIR));
    Ok(files)
}
