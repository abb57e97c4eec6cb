//! Protocol Buffers (proto3) generation.
//!
//! Field numbers come from the `order` annotation of each selection, so
//! every projected field must carry one. Enums live in a shared
//! `<package_root>.enums` package written during post-processing.

use crate::options::BackendOptions;
use crate::support::{aggregated_enums, enum_additional_code, header_lines};
use polymsg_core::naming::{camel_to_snake_case, capitalize};
use polymsg_core::output::{extract_dir, file_descriptor};
use polymsg_core::projection::{DescriptorKind, FieldType, ModifierSets, ObjectSpec, ProjectedField};
use polymsg_core::schema::EnumValue;
use polymsg_core::{
    Backend, FileDescriptor, GeneratedCode, Message, NameContext, ProjectionError,
    ProjectionResult, ScalarDef, ScalarTable, Schema, TypeEmitter, project_message,
};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ID: &str = "protobuf";
const EXTENSION: &str = "proto";
const DEFAULT_PACKAGE_ROOT: &str = "polymsg";
const DEFAULT_GO_PACKAGE_PREFIX: &str = "example.com/polymsg/go-proto";
const UNSPECIFIED: &str = "UNSPECIFIED";

/// Built-in protobuf scalar table
pub fn default_scalars() -> ScalarTable {
    ScalarTable::new()
        .with_scalar("Date", ScalarDef::new("google.type.Date").with_import("google/type/date.proto"))
        .with_scalar(
            "DateTime",
            ScalarDef::new("google.protobuf.Timestamp").with_import("google/protobuf/timestamp.proto"),
        )
        .with_scalar("UUID", ScalarDef::new("string"))
        .with_scalar("Phone", ScalarDef::new("string"))
        .with_scalar("ZIPCode", ScalarDef::new("string"))
        .with_scalar("Email", ScalarDef::new("string"))
        .with_scalar(
            "Any",
            ScalarDef::new("google.protobuf.Any").with_import("google/protobuf/any.proto"),
        )
        .with_conversion("String", "string")
        .with_conversion("ID", "string")
        .with_conversion("Int", "int64")
        .with_conversion("Float", "double")
        .with_conversion("Boolean", "bool")
        .with_conversion("Any", "google.protobuf.Any")
}

#[derive(Debug, Clone)]
pub struct ProtobufBackend {
    scalars: ScalarTable,
    output_dir: PathBuf,
    static_dir: Option<PathBuf>,
    package_root: String,
    go_package_prefix: String,
}

impl ProtobufBackend {
    pub fn new(scalars: ScalarTable, options: &BackendOptions) -> Self {
        Self {
            scalars,
            output_dir: options.output_dir(ID),
            static_dir: options.static_dir.clone(),
            package_root: options
                .package_root
                .clone()
                .unwrap_or_else(|| DEFAULT_PACKAGE_ROOT.to_string()),
            go_package_prefix: options
                .go_package_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_GO_PACKAGE_PREFIX.to_string()),
        }
    }

    /// Message definition with fields sorted by their `order` annotation
    fn message_code(&self, name: &str, fields: &[ProjectedField]) -> ProjectionResult<String> {
        let mut numbered = fields
            .iter()
            .map(|field| {
                field
                    .order()
                    .map(|order| (order, field))
                    .ok_or_else(|| ProjectionError::MissingFieldOrder {
                        type_name: name.to_string(),
                        field: field.name.clone(),
                    })
            })
            .collect::<ProjectionResult<Vec<_>>>()?;
        numbered.sort_by_key(|(order, _)| *order);

        let mut code = format!("message {name} {{\n");
        for (order, field) in numbered {
            let repeated = if field.modifiers.array { "repeated " } else { "" };
            let ty = match &field.ty {
                FieldType::Enum { native, .. } => format!("enums.{native}"),
                ty => ty.native(),
            };
            let field_name = camel_to_snake_case(&self.format_name(&field.name, NameContext::Field));
            code.push_str(&format!("    {repeated}{ty} {field_name} = {order};\n"));
        }
        code.push_str("}\n");
        Ok(code)
    }

    fn package(&self, message: &Message) -> String {
        let mut parts = vec![self.package_root.clone()];
        if !message.namespace.is_empty() {
            parts.push(camel_to_snake_case(&message.namespace));
        }
        if message.version > 1 {
            parts.push(format!("v{}", message.version));
        }
        parts.push(camel_to_snake_case(&message.name));
        parts.join(".")
    }

    fn go_package(&self, message: &Message) -> String {
        let last = message.namespace.rsplit('.').next().unwrap_or_default();
        let mut entity = camel_to_snake_case(last);
        if message.version > 1 {
            if !entity.is_empty() {
                entity.push('_');
            }
            entity.push_str(&format!("v{}", message.version));
        }

        let mut path = vec![self.go_package_prefix.clone()];
        if !entity.is_empty() {
            path.push(entity);
        }
        path.push(camel_to_snake_case(&message.name));
        path.join("/")
    }
}

impl TypeEmitter for ProtobufBackend {
    type Fragment = String;

    fn struct_def(&self, spec: &ObjectSpec, _modifiers: &ModifierSets) -> ProjectionResult<String> {
        self.message_code(&spec.name, &spec.fields)
    }

    fn enum_def(&self, name: &str, values: &[EnumValue]) -> String {
        let mut code = format!("enum {name} {{\n");
        code.push_str(&format!(
            "    {}_{UNSPECIFIED} = 0;\n",
            camel_to_snake_case(name).to_uppercase()
        ));
        let values = values.iter().filter(|v| !v.name.contains(UNSPECIFIED));
        for (idx, value) in values.enumerate() {
            code.push_str(&format!(
                "    {} = {};\n",
                camel_to_snake_case(&value.name).to_uppercase(),
                idx + 1
            ));
        }
        code.push_str("}\n");
        code
    }

    fn convert_type(&self, name: &str) -> String {
        self.scalars.convert(name)
    }

    fn format_name(&self, name: &str, _context: NameContext) -> String {
        match name {
            "iD" => "ID".to_string(),
            other => other.to_string(),
        }
    }
}

impl Backend for ProtobufBackend {
    fn id(&self) -> &str {
        ID
    }

    fn extension(&self) -> &str {
        EXTENSION
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn static_dir(&self) -> Option<&Path> {
        self.static_dir.as_deref()
    }

    fn generate(&self, message: &Message, schema: &Schema) -> ProjectionResult<GeneratedCode> {
        let projection = project_message(message, schema, &self.scalars, self)?;
        let root = self.message_code(&capitalize(&message.name), &projection.root.fields)?;

        let mut imports: Vec<String> = Vec::new();
        for import in projection.scalars().into_iter().filter_map(|s| s.def.import.as_deref()) {
            if !imports.iter().any(|i| i == import) {
                imports.push(import.to_string());
            }
        }
        if projection.enums().next().is_some() {
            imports.push(format!("{}/enums/enums.proto", self.package_root));
        }

        let package = self.package(message);
        let mut code = format!("syntax = \"proto3\";\n\npackage {package};\n\n");
        for line in header_lines(message) {
            code.push_str(&format!("// {line}\n"));
        }
        code.push('\n');
        for import in &imports {
            code.push_str(&format!("import \"{import}\";\n"));
        }
        if !imports.is_empty() {
            code.push('\n');
        }
        code.push_str(&format!("option go_package = \"{}\";\n", self.go_package(message)));

        for descriptor in projection.unique_types() {
            if descriptor.kind == DescriptorKind::Object
                && let Some(fragment) = &descriptor.add_on
            {
                code.push('\n');
                code.push_str(fragment);
            }
        }
        code.push('\n');
        code.push_str(&root);

        debug!(message = %message.name, package = %package, "generated proto file");

        Ok(GeneratedCode {
            additional_code: enum_additional_code(&projection),
            imports,
            ..GeneratedCode::new(code, message.name.clone())
        })
    }

    fn post_process(&self, files: &mut Vec<FileDescriptor>, _message_dir: &Path) {
        let enums_file = {
            let (carriers, enums) = aggregated_enums(EXTENSION, files);
            let Some(dir) = extract_dir(carriers.iter().copied()) else {
                return;
            };
            let mut code = format!(
                "syntax = \"proto3\";\n\npackage {}.enums;\n\noption go_package = \"{}/enums\";\n",
                self.package_root, self.go_package_prefix
            );
            for entry in &enums {
                code.push('\n');
                code.push_str(&entry.code);
            }
            file_descriptor(dir, "enums/enums.proto", code)
        };
        files.push(enums_file);
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::test_support::{address_schema, generate_files, new_address, new_location};
    use polymsg_core::Selection;

    fn backend() -> ProtobufBackend {
        ProtobufBackend::new(default_scalars(), &BackendOptions::default())
    }

    #[test]
    fn generate___new_address___header_package_and_options() {
        let code = backend().generate(&new_address(), &address_schema()).unwrap().code;

        assert!(code.starts_with("syntax = \"proto3\";\n\npackage polymsg.address.new_address;\n"));
        assert!(code.contains("// New Address\n"));
        assert!(code.contains("import \"polymsg/enums/enums.proto\";\n"));
        assert!(code.contains(
            "option go_package = \"example.com/polymsg/go-proto/address/new_address\";\n"
        ));
    }

    #[test]
    fn generate___new_address___fields_numbered_by_order() {
        let code = backend().generate(&new_address(), &address_schema()).unwrap().code;

        assert!(code.contains(
            "message NewAddress {\n    repeated string street = 1;\n    string city = 2;\n    enums.State state = 3;\n    string zip = 4;\n}\n"
        ));
    }

    #[test]
    fn generate___selection_order_differs___sorted_by_annotation() {
        let mut message = new_address();
        message.selections.reverse();

        let code = backend().generate(&message, &address_schema()).unwrap().code;

        let street = code.find("street = 1").unwrap();
        let zip = code.find("zip = 4").unwrap();
        assert!(street < zip);
    }

    #[test]
    fn generate___missing_order___fails() {
        let mut message = new_address();
        message.selections.push(Selection::new("id"));

        let result = backend().generate(&message, &address_schema());

        assert_eq!(
            result,
            Err(ProjectionError::MissingFieldOrder {
                type_name: "NewAddress".to_string(),
                field: "id".to_string(),
            })
        );
    }

    #[test]
    fn generate___version_two___versioned_package_and_nested_message() {
        let code = backend().generate(&new_location(), &address_schema()).unwrap().code;

        assert!(code.contains("package polymsg.address.geo.v2.new_location;\n"));
        assert!(code.contains(
            "option go_package = \"example.com/polymsg/go-proto/geo_v2/new_location\";\n"
        ));
        assert!(code.contains("message Location {\n    double lat = 1;\n    double lng = 2;\n}\n"));
        assert!(code.contains("    Location location = 2;\n"));
    }

    #[test]
    fn enum_def___unspecified_values___skipped_and_renumbered() {
        let values = [
            EnumValue::new("STATUS_UNSPECIFIED"),
            EnumValue::new("active"),
            EnumValue::new("suspendedUser"),
        ];

        let code = backend().enum_def("AccountStatus", &values);

        assert_eq!(
            code,
            "enum AccountStatus {\n    ACCOUNT_STATUS_UNSPECIFIED = 0;\n    ACTIVE = 1;\n    SUSPENDED_USER = 2;\n}\n"
        );
    }

    #[test]
    fn post_process___shared_enum___one_enums_proto() {
        let files = generate_files(&backend(), &[new_address(), new_location()]).unwrap();

        let enums: Vec<&FileDescriptor> = files.iter().filter(|f| f.path == "enums").collect();
        assert_eq!(enums.len(), 1);
        assert_eq!(enums[0].extension, "proto");
        assert!(enums[0].code.contains("package polymsg.enums;\n"));
        assert!(enums[0].code.contains("option go_package = \"example.com/polymsg/go-proto/enums\";\n"));
        assert_eq!(enums[0].code.matches("enum State {").count(), 1);
    }
}
