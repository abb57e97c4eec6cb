//! Go struct generation.
//!
//! Each message becomes one Go package holding a struct per projected
//! object plus the root struct. Every struct has a `Validate()` method that
//! checks required fields, scalar patterns and nested values. Enums are
//! shared across messages in an `enums` package written during
//! post-processing.

use crate::options::BackendOptions;
use crate::support::{aggregated_enums, base_type, enum_additional_code, header_lines, quoted, type_fragments};
use polymsg_core::naming::{capitalize, first_lower};
use polymsg_core::output::{extract_dir, file_descriptor};
use polymsg_core::projection::{DescriptorKind, FieldType, ModifierSets, ObjectSpec, ProjectedField};
use polymsg_core::schema::EnumValue;
use polymsg_core::{
    Backend, FileDescriptor, GeneratedCode, Message, NameContext, ProjectionResult, ScalarDef,
    ScalarTable, Schema, TypeEmitter, project_message,
};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ID: &str = "go";
const EXTENSION: &str = "go";
const DEFAULT_MODULE_PATH: &str = "example.com/polymsg/output/go";

/// Built-in Go scalar table
pub fn default_scalars() -> ScalarTable {
    ScalarTable::new()
        .with_scalar("ISODate", ScalarDef::new("civil.Date").with_import("cloud.google.com/go/civil"))
        .with_scalar("DateTime", ScalarDef::new("time.Time").with_import("time"))
        .with_scalar("CurrencyCent", ScalarDef::new("int64"))
        .with_scalar(
            "UUID",
            ScalarDef::new("string")
                .with_pattern("^[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$"),
        )
        .with_scalar("Phone", ScalarDef::new("string").with_pattern(r"^\+?[1-9]\d{1,14}$"))
        .with_scalar("ZIPCode", ScalarDef::new("string").with_pattern("^[0-9]{5}(?:-[0-9]{4})?$"))
        .with_scalar("Email", ScalarDef::new("string"))
        .with_scalar("Any", ScalarDef::new("json.RawMessage").with_import("encoding/json"))
        .with_conversion("String", "string")
        .with_conversion("ID", "string")
        .with_conversion("Int", "int64")
        .with_conversion("Float", "float64")
        .with_conversion("Boolean", "bool")
        .with_conversion("Any", "json.RawMessage")
}

#[derive(Debug, Clone)]
pub struct GoBackend {
    scalars: ScalarTable,
    output_dir: PathBuf,
    static_dir: Option<PathBuf>,
    module_path: String,
}

impl GoBackend {
    pub fn new(scalars: ScalarTable, options: &BackendOptions) -> Self {
        Self {
            scalars,
            output_dir: options.output_dir(ID),
            static_dir: options.static_dir.clone(),
            module_path: options
                .module_path
                .clone()
                .unwrap_or_else(|| DEFAULT_MODULE_PATH.to_string()),
        }
    }

    fn field_type(&self, field: &ProjectedField) -> String {
        let base = match &field.ty {
            FieldType::Enum { native, .. } => format!("enums.{native}"),
            _ => base_type(field),
        };
        if field.modifiers.array {
            format!("[]{base}")
        } else {
            format!("*{base}")
        }
    }

    fn struct_code(&self, name: &str, fields: &[ProjectedField], modifiers: &ModifierSets) -> String {
        let mut code = String::new();

        code.push_str(&format!("type {name} struct {{\n"));
        for field in fields {
            let json = self.format_name(&first_lower(&field.name), NameContext::Json);
            code.push_str(&format!(
                "\t{} {} `json:\"{},omitempty\"`\n",
                capitalize(&field.name),
                self.field_type(field),
                json
            ));
        }
        code.push_str("}\n\n");

        code.push_str(&format!("func (o {name}) Validate() error {{\n"));
        for field in fields {
            code.push_str(&field_validation(name, field, modifiers.is_required(&field.name)));
        }
        code.push_str("\treturn nil\n}\n");
        code
    }

    fn imports(&self, projection_body: &str, scalars: &[&ScalarDef], has_enums: bool) -> Vec<String> {
        let mut imports = Vec::new();
        if projection_body.contains("fmt.") {
            imports.push("fmt".to_string());
        }
        if scalars.iter().any(|s| s.pattern.is_some()) {
            imports.push("regexp".to_string());
        }
        for import in scalars.iter().filter_map(|s| s.import.as_deref()) {
            if !imports.iter().any(|i| i == import) {
                imports.push(import.to_string());
            }
        }
        if has_enums {
            imports.push(format!("{}/enums", self.module_path));
        }
        imports
    }
}

/// Checks for one field, in order: presence, pattern, nested validation
fn field_validation(owner: &str, field: &ProjectedField, required: bool) -> String {
    let go_name = capitalize(&field.name);
    let mut code = String::new();

    if required {
        code.push_str(&format!(
            "\tif o.{go_name} == nil {{\n\t\treturn fmt.Errorf(\"{go_name} is a required property of {owner}\")\n\t}}\n"
        ));
    }

    if let Some(pattern) = field.pattern() {
        let pattern = quoted(pattern);
        let check = if field.modifiers.array {
            format!(
                "\tfor _, element := range o.{go_name} {{\n\t\tif matched, err := regexp.MatchString({pattern}, element); !matched || err != nil {{\n\t\t\treturn fmt.Errorf(\"invalid element of {go_name} in {owner}\")\n\t\t}}\n\t}}\n"
            )
        } else {
            format!(
                "\tif matched, err := regexp.MatchString({pattern}, *o.{go_name}); !matched || err != nil {{\n\t\treturn fmt.Errorf(\"invalid {go_name} value of {owner}\")\n\t}}\n"
            )
        };
        code.push_str(&nil_guarded(&go_name, check, required || field.modifiers.array));
    }

    if matches!(field.ty, FieldType::Enum { .. } | FieldType::Object(_)) {
        let check = if field.modifiers.array {
            format!(
                "\tfor _, element := range o.{go_name} {{\n\t\tif err := element.Validate(); err != nil {{\n\t\t\treturn fmt.Errorf(\"an element of {go_name} is invalid: %w\", err)\n\t\t}}\n\t}}\n"
            )
        } else {
            format!(
                "\tif err := o.{go_name}.Validate(); err != nil {{\n\t\treturn fmt.Errorf(\"{go_name} is invalid: %w\", err)\n\t}}\n"
            )
        };
        code.push_str(&nil_guarded(&go_name, check, required || field.modifiers.array));
    }

    code
}

/// Wrap `check` in a nil test unless the value is known to be present
fn nil_guarded(go_name: &str, check: String, present: bool) -> String {
    if present {
        return check;
    }
    let indented: String = check.lines().map(|line| format!("\t{line}\n")).collect();
    format!("\tif o.{go_name} != nil {{\n{indented}\t}}\n")
}

impl TypeEmitter for GoBackend {
    type Fragment = String;

    fn struct_def(&self, spec: &ObjectSpec, modifiers: &ModifierSets) -> ProjectionResult<String> {
        Ok(self.struct_code(&spec.name, &spec.fields, modifiers))
    }

    fn enum_def(&self, name: &str, values: &[EnumValue]) -> String {
        let mut code = String::new();

        code.push_str(&format!("type {name} string\n\nconst (\n"));
        for value in values {
            code.push_str(&format!("\t{0} {name} = \"{0}\"\n", value.name));
        }
        code.push_str(")\n\n");

        code.push_str(&format!("func (v {name}) Validate() error {{\n\tswitch v {{\n"));
        if !values.is_empty() {
            let names: Vec<&str> = values.iter().map(|v| v.name.as_str()).collect();
            code.push_str(&format!("\tcase {}:\n\t\treturn nil\n", names.join(", ")));
        }
        code.push_str(&format!(
            "\tdefault:\n\t\treturn fmt.Errorf(\"%s is not a valid {name} value\", v)\n\t}}\n}}\n"
        ));
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

impl Backend for GoBackend {
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
        let root_name = capitalize(&message.name);

        let mut body = String::new();
        for (kind, fragment) in type_fragments(&projection) {
            if kind == DescriptorKind::Object {
                body.push_str(&fragment);
                body.push('\n');
            }
        }
        body.push_str(&self.struct_code(
            &root_name,
            &projection.root.fields,
            &projection.root.modifiers,
        ));

        let scalars: Vec<&ScalarDef> = projection.scalars().into_iter().map(|s| &s.def).collect();
        let has_enums = projection.enums().next().is_some();
        let imports = self.imports(&body, &scalars, has_enums);

        let package = if message.namespace.is_empty() {
            message.name.clone()
        } else {
            format!("{}_{}", message.namespace.replace('.', "_"), message.name)
        };

        let mut code = format!("package {package}\n\n");
        if !imports.is_empty() {
            code.push_str("import (\n");
            for import in &imports {
                code.push_str(&format!("\t\"{import}\"\n"));
            }
            code.push_str(")\n\n");
        }
        for line in header_lines(message) {
            code.push_str(&format!("// {line}\n"));
        }
        code.push('\n');
        code.push_str(&body);

        debug!(message = %message.name, package = %package, "generated go package");

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
            let mut code = String::from("package enums\n\nimport \"fmt\"\n");
            for entry in &enums {
                code.push('\n');
                code.push_str(&entry.code);
            }
            file_descriptor(dir, "enums/enums.go", code)
        };
        files.push(enums_file);
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::test_support::{address_schema, generate_files, new_address, new_location};

    fn backend() -> GoBackend {
        GoBackend::new(default_scalars(), &BackendOptions::default())
    }

    #[test]
    fn generate___new_address___package_and_root_struct() {
        let generated = backend().generate(&new_address(), &address_schema()).unwrap();

        assert_eq!(generated.path, "newAddress");
        assert!(generated.code.starts_with("package address_newAddress\n"));
        assert!(generated.code.contains("// New Address\n// A new postal address\n"));
        assert!(generated.code.contains("type NewAddress struct {\n"));
        assert!(generated.code.contains("\tStreet []string `json:\"street,omitempty\"`\n"));
        assert!(generated.code.contains("\tState *enums.State `json:\"state,omitempty\"`\n"));
        assert!(generated.code.contains("\tZip *string `json:\"zip,omitempty\"`\n"));
    }

    #[test]
    fn generate___new_address___validates_required_pattern_and_enum() {
        let code = backend().generate(&new_address(), &address_schema()).unwrap().code;

        assert!(code.contains("\tif o.City == nil {\n\t\treturn fmt.Errorf(\"City is a required property of NewAddress\")\n"));
        assert!(code.contains(r#"regexp.MatchString("^[0-9]{5}(?:-[0-9]{4})?$", *o.Zip)"#));
        assert!(code.contains("\tif o.Zip != nil {\n"));
        assert!(code.contains("\t\tif err := o.State.Validate(); err != nil {\n"));
    }

    #[test]
    fn generate___new_address___imports() {
        let generated = backend().generate(&new_address(), &address_schema()).unwrap();

        assert_eq!(
            generated.imports,
            vec!["fmt", "regexp", "example.com/polymsg/output/go/enums"]
        );
        assert!(generated.code.contains("import (\n\t\"fmt\"\n\t\"regexp\"\n"));
    }

    #[test]
    fn generate___new_address___enum_is_additional_code() {
        let generated = backend().generate(&new_address(), &address_schema()).unwrap();

        assert_eq!(generated.additional_code.len(), 1);
        assert_eq!(generated.additional_code[0].type_name, "State");
        assert!(!generated.code.contains("type State string"));
    }

    #[test]
    fn generate___nested_object___emitted_before_root() {
        let code = backend().generate(&new_location(), &address_schema()).unwrap().code;

        let location = code.find("type Location struct").unwrap();
        let root = code.find("type NewLocation struct").unwrap();
        assert!(location < root);
        assert!(code.starts_with("package address_geo_newLocation\n"));
        assert!(code.contains("\tId *string `json:\"id,omitempty\"`\n"));
        assert!(code.contains("\tif o.Id == nil {\n"));
        assert!(code.contains("\tif o.Location != nil {\n\t\tif err := o.Location.Validate(); err != nil {\n"));
    }

    #[test]
    fn enum_def___values___constants_and_validate() {
        let code = backend().enum_def("State", &[EnumValue::new("CA"), EnumValue::new("NY")]);

        assert!(code.starts_with("type State string\n\nconst (\n\tCA State = \"CA\"\n\tNY State = \"NY\"\n)\n"));
        assert!(code.contains("\tcase CA, NY:\n\t\treturn nil\n"));
        assert!(code.contains("\"%s is not a valid State value\""));
    }

    #[test]
    fn format_name___id___uppercased() {
        assert_eq!(backend().format_name("iD", NameContext::Json), "ID");
        assert_eq!(backend().format_name("city", NameContext::Json), "city");
    }

    #[test]
    fn post_process___shared_enum___one_enums_package() {
        let files = generate_files(&backend(), &[new_address(), new_location()]).unwrap();

        let enums: Vec<&FileDescriptor> = files.iter().filter(|f| f.path == "enums").collect();
        assert_eq!(enums.len(), 1);
        assert_eq!(enums[0].output_file_name, PathBuf::from("enums"));
        assert_eq!(enums[0].extension, "go");
        assert_eq!(enums[0].code.matches("type State string").count(), 1);
        assert!(enums[0].code.starts_with("package enums\n\nimport \"fmt\"\n"));
    }

    #[test]
    fn post_process___no_enums___no_file() {
        let mut message = new_address();
        message.selections.retain(|s| s.name != "state");

        let files = generate_files(&backend(), &[message]).unwrap();

        assert_eq!(files.len(), 1);
    }
}
