//! JSON Schema generation.
//!
//! The root type is inlined ("rootless"): its properties become the
//! document's top-level `properties`. Objects and enums go into
//! `definitions` and are referenced by `$ref: "#<Type>"`. Scalars are
//! inlined with their `type` and `pattern`.

use crate::options::BackendOptions;
use polymsg_core::projection::{DescriptorKind, FieldType, ModifierSets, ObjectSpec, ProjectedField};
use polymsg_core::schema::EnumValue;
use polymsg_core::{
    Backend, GeneratedCode, Message, ProjectionError, ProjectionResult, ScalarDef, ScalarTable,
    Schema, TypeEmitter, TypeName, project_message,
};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const ID: &str = "json-schema";
const EXTENSION: &str = "json";
const DEFAULT_SCHEMA_VERSION: &str = "http://json-schema.org/draft-07/schema#";
const DEFAULT_URI_SCHEME: &str = "http://example.com";

/// Built-in JSON Schema scalar table
pub fn default_scalars() -> ScalarTable {
    ScalarTable::new()
        .with_scalar("Date", ScalarDef::new("string").with_pattern("^[0-9]{4}-[0-9]{2}-[0-9]{2}$"))
        .with_scalar(
            "DateTime",
            ScalarDef::new("string")
                .with_pattern("^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}$"),
        )
        .with_scalar("CurrencyCent", ScalarDef::new("integer"))
        .with_scalar(
            "UUID",
            ScalarDef::new("string")
                .with_pattern("^[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$"),
        )
        .with_scalar("Phone", ScalarDef::new("string").with_pattern(r"^\+?[1-9]\d{1,14}$"))
        .with_scalar("ZIPCode", ScalarDef::new("string").with_pattern("^[0-9]{5}(?:-[0-9]{4})?$"))
        .with_scalar("Email", ScalarDef::new("string"))
        .with_scalar(
            "Any",
            ScalarDef::many(&["object", "array", "string", "number", "boolean", "null"]),
        )
        .with_conversion("String", "string")
        .with_conversion("ID", TypeName::Many(vec!["number".into(), "string".into()]))
        .with_conversion("Int", "integer")
        .with_conversion("Float", "number")
        .with_conversion("Boolean", "boolean")
}

#[derive(Debug, Clone)]
pub struct JsonSchemaBackend {
    scalars: ScalarTable,
    output_dir: PathBuf,
    static_dir: Option<PathBuf>,
    uri_scheme: String,
    schema_version: String,
}

impl JsonSchemaBackend {
    pub fn new(scalars: ScalarTable, options: &BackendOptions) -> Self {
        Self {
            scalars,
            output_dir: options.output_dir(ID),
            static_dir: options.static_dir.clone(),
            uri_scheme: options
                .uri_scheme
                .clone()
                .unwrap_or_else(|| DEFAULT_URI_SCHEME.to_string()),
            schema_version: options
                .schema_version
                .clone()
                .unwrap_or_else(|| DEFAULT_SCHEMA_VERSION.to_string()),
        }
    }

    fn field_schema(&self, field: &ProjectedField) -> Value {
        let item = match &field.ty {
            FieldType::Builtin { name, native } => {
                let ty = self
                    .scalars
                    .conversion(name)
                    .and_then(|t| serde_json::to_value(t).ok())
                    .unwrap_or_else(|| json!(native));
                json!({ "type": ty })
            }
            FieldType::Scalar(scalar) => {
                let mut schema = json!({ "type": scalar.def.ty });
                if let Some(pattern) = &scalar.def.pattern {
                    schema["pattern"] = json!(pattern);
                }
                schema
            }
            FieldType::Enum { native, .. } => json!({ "$ref": format!("#{native}") }),
            FieldType::Object(name) => json!({ "$ref": format!("#{name}") }),
        };

        if field.modifiers.array {
            json!({ "type": "array", "items": item })
        } else {
            item
        }
    }

    /// `properties` and `required` of an object
    fn object_members(&self, fields: &[ProjectedField], modifiers: &ModifierSets) -> (Map<String, Value>, Vec<String>) {
        let properties = fields
            .iter()
            .map(|f| (f.name.clone(), self.field_schema(f)))
            .collect();
        (properties, modifiers.required.clone())
    }
}

impl TypeEmitter for JsonSchemaBackend {
    type Fragment = Value;

    fn struct_def(&self, spec: &ObjectSpec, modifiers: &ModifierSets) -> ProjectionResult<Value> {
        let (properties, required) = self.object_members(&spec.fields, modifiers);
        let mut schema = json!({
            "$id": format!("#{}", spec.name),
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        Ok(schema)
    }

    fn enum_def(&self, name: &str, values: &[EnumValue]) -> Value {
        let values: Vec<&str> = values.iter().map(|v| v.name.as_str()).collect();
        json!({
            "$id": format!("#{name}"),
            "enum": values,
        })
    }

    fn convert_type(&self, name: &str) -> String {
        self.scalars.convert(name)
    }
}

impl Backend for JsonSchemaBackend {
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

        let definitions: Map<String, Value> = projection
            .unique_types()
            .into_iter()
            .filter(|t| t.kind != DescriptorKind::Scalar)
            .filter_map(|t| t.add_on.clone().map(|code| (t.type_name.clone(), code)))
            .collect();
        let (properties, required) =
            self.object_members(&projection.root.fields, &projection.root.modifiers);

        let mut document = json!({
            "$schema": self.schema_version,
            "$id": format!("{}/{}.schema.json/v{}", self.uri_scheme, message.namespace, message.version),
            "type": "object",
            "properties": properties,
        });
        if let Some(title) = &message.title {
            document["title"] = json!(title);
        }
        if let Some(description) = &message.description {
            document["description"] = json!(description);
        }
        if !required.is_empty() {
            document["required"] = json!(required);
        }
        if !definitions.is_empty() {
            document["definitions"] = Value::Object(definitions);
        }

        let code = serde_json::to_string(&document)
            .map_err(|e| ProjectionError::Serialization(e.to_string()))?;

        debug!(message = %message.name, bytes = code.len(), "generated json schema");

        Ok(GeneratedCode::new(code, ""))
    }

    /// Pretty-print with a four-space indent
    fn format_output(&self, code: String) -> String {
        let value: Value = match serde_json::from_str(&code) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "json schema output is not valid JSON; leaving unformatted");
                return code;
            }
        };

        let mut out = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        if value.serialize(&mut serializer).is_err() {
            return code;
        }
        String::from_utf8(out).unwrap_or(code)
    }
}
