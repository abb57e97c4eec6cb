//! Ruby module generation.
//!
//! Each message becomes a module of builder methods, one per projected
//! object plus `build` for the root. Builders validate their arguments and
//! return a hash. Post-processing writes the root require file, which holds
//! the shared enums module and requires every generated file.

use crate::options::BackendOptions;
use crate::support::{aggregated_enums, enum_additional_code, header_lines};
use polymsg_core::naming::{camel_to_snake_case, capitalize, kebab_to_snake};
use polymsg_core::output::{extract_dir, file_descriptor, files_with_extension};
use polymsg_core::projection::{DescriptorKind, FieldType, ModifierSets, ObjectSpec, ProjectedField};
use polymsg_core::schema::EnumValue;
use polymsg_core::{
    Backend, FileDescriptor, GeneratedCode, Message, NameContext, ProjectionResult, ScalarDef,
    ScalarTable, Schema, TypeEmitter, project_message,
};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ID: &str = "ruby";
const EXTENSION: &str = "rb";
const DEFAULT_ROOT_MODULE: &str = "PolyMsg";
const DEFAULT_ROOT_FILE: &str = "schemas";

/// Module name the bundled support files are written against
const SUPPORT_MODULE: &str = "PolyMsg";
const UTILS_RB: &str = include_str!("../static/ruby/utils.rb");
const ENUMS_RB: &str = include_str!("../static/ruby/enums.rb");

/// Built-in Ruby scalar table
pub fn default_scalars() -> ScalarTable {
    ScalarTable::new()
        .with_scalar("Date", ScalarDef::new("Date"))
        .with_scalar("DateTime", ScalarDef::new("DateTime"))
        .with_scalar("Any", ScalarDef::new("Hash"))
        .with_scalar(
            "UUID",
            ScalarDef::new("String")
                .with_pattern("^[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$"),
        )
        .with_scalar("Phone", ScalarDef::new("String").with_pattern(r"^\+?[1-9]\d{1,14}$"))
        .with_scalar("ZIPCode", ScalarDef::new("String").with_pattern("^[0-9]{5}(?:-[0-9]{4})?$"))
        .with_scalar("Email", ScalarDef::new("String"))
        .with_conversion("String", "String")
        .with_conversion("ID", "String")
        .with_conversion("Int", "Numeric")
        .with_conversion("Float", "Numeric")
        .with_conversion("Boolean", "Boolean")
}

/// Path of a generated file relative to the output directory, without extension.
///
/// The message file name is made relative to `message_dir`, its last
/// component is replaced by `path` (when non-empty) followed by the file
/// stem, and dashes become underscores.
pub fn require_path(file_name: &Path, message_dir: &Path, path: &str) -> String {
    let relative = file_name.strip_prefix(message_dir).unwrap_or(file_name);
    let mut elements: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if !path.is_empty() {
        elements.push(path.to_string());
    }
    if let Some(stem) = relative.file_stem() {
        elements.push(stem.to_string_lossy().into_owned());
    }
    kebab_to_snake(&elements.join("/"))
}

#[derive(Debug, Clone)]
pub struct RubyBackend {
    scalars: ScalarTable,
    output_dir: PathBuf,
    static_dir: Option<PathBuf>,
    root_module: String,
    root_file: String,
}

impl RubyBackend {
    pub fn new(scalars: ScalarTable, options: &BackendOptions) -> Self {
        Self {
            scalars,
            output_dir: options.output_dir(ID),
            static_dir: options.static_dir.clone(),
            root_module: options
                .root_module
                .clone()
                .unwrap_or_else(|| DEFAULT_ROOT_MODULE.to_string()),
            root_file: options
                .root_file
                .clone()
                .unwrap_or_else(|| DEFAULT_ROOT_FILE.to_string()),
        }
    }

    fn param(&self, field: &ProjectedField) -> String {
        self.format_name(&field.name, NameContext::Field)
    }

    fn builder(
        &self,
        method: &str,
        error_type: &str,
        fields: &[ProjectedField],
        modifiers: &ModifierSets,
    ) -> String {
        let params: Vec<String> = fields.iter().map(|f| self.param(f)).collect();
        let mut code = String::new();

        code.push_str(&format!("\n    def self.{method}({})\n", params.join(", ")));
        for field in fields {
            for rule in self.rules(field, modifiers.is_required(&field.name)) {
                code.push_str(&format!("      raise(Invalid{error_type}Error, {rule}\n"));
            }
        }
        code.push_str("\n      {\n");
        let entries: Vec<String> = fields
            .iter()
            .map(|f| format!("        \"{}\" => {}", f.name, self.param(f)))
            .collect();
        code.push_str(&entries.join(",\n"));
        code.push_str("\n      }\n    end\n");
        code.push_str(&format!("\n    class Invalid{error_type}Error < StandardError\n    end\n"));
        code
    }

    /// `raise` arguments and conditions for one field, minus the error class
    fn rules(&self, field: &ProjectedField, required: bool) -> Vec<String> {
        let p = self.param(field);
        let array = field.modifiers.array;
        let mut rules = Vec::new();

        if required {
            rules.push(format!("\"Required value {p} is undefined\") if {p}.nil?"));
        }

        if array {
            rules.push(format!("\"{p} must be an Array\") unless {p}.nil? || {p}.is_a?(Array)"));
        }

        match &field.ty {
            FieldType::Enum { native, .. } => {
                let check = format!(
                    "{}::Enums.{}_value_valid?",
                    self.root_module,
                    camel_to_snake_case(native)
                );
                let condition = if array {
                    format!("{p}.all? {{ |v| {check}(v) }}")
                } else {
                    format!("{check}({p})")
                };
                rules.push(format!(
                    "\"Enum value #{{{p}}} is invalid\") unless {p}.nil? || {condition}"
                ));
            }
            ty => {
                let native = match ty {
                    FieldType::Object(_) => "Hash".to_string(),
                    _ => ty.native(),
                };
                let noun = if native == "Boolean" {
                    "a boolean".to_string()
                } else {
                    format!("a {native}")
                };
                if array {
                    rules.push(format!(
                        "\"Elements of {p} must be {noun}\") unless {p}.nil? || {p}.all? {{ |v| {} }}",
                        type_test("v", &native)
                    ));
                } else {
                    rules.push(format!(
                        "\"{p} must be {noun}\") unless {p}.nil? || {}",
                        type_test(&p, &native)
                    ));
                }
            }
        }

        if let Some(pattern) = field.pattern() {
            let regex = format!("/{}/", pattern.replace('/', "\\/"));
            let condition = if array {
                format!("{p}.all? {{ |v| v.match?({regex}) }}")
            } else {
                format!("{p}.match?({regex})")
            };
            rules.push(format!("\"Invalid {p} value\") unless {p}.nil? || {condition}"));
        }

        rules
    }

    fn module_path(&self, message: &Message) -> Vec<String> {
        let mut path = vec![self.root_module.clone()];
        path.extend(
            message
                .namespace
                .split('.')
                .filter(|part| !part.is_empty())
                .map(capitalize),
        );
        if message.version > 1 {
            path.push(format!("V{}", message.version));
        }
        path
    }

    fn support_files(&self, dir: &Path) -> Vec<FileDescriptor> {
        [("utils.rb", UTILS_RB), ("enums.rb", ENUMS_RB)]
            .into_iter()
            .map(|(name, code)| {
                file_descriptor(dir, name, code.replace(SUPPORT_MODULE, &self.root_module))
            })
            .collect()
    }
}

/// Ruby has no Boolean class
fn type_test(value: &str, native: &str) -> String {
    if native == "Boolean" {
        format!("[true, false].include?({value})")
    } else {
        format!("{value}.is_a?({native})")
    }
}

impl TypeEmitter for RubyBackend {
    type Fragment = String;

    fn struct_def(&self, spec: &ObjectSpec, modifiers: &ModifierSets) -> ProjectionResult<String> {
        Ok(self.builder(&spec.name, &spec.name, &spec.fields, modifiers))
    }

    fn enum_def(&self, name: &str, values: &[EnumValue]) -> String {
        let constant = camel_to_snake_case(name).to_uppercase();
        let values: Vec<&str> = values.iter().map(|v| v.name.as_str()).collect();
        format!(
            "  {constant} = %i[{}].freeze\n\n  def self.{}_value_valid?(v)\n    {constant}.include?(v.to_s.to_sym)\n  end\n\n  class Invalid{}Error < StandardError\n  end\n",
            values.join(" "),
            camel_to_snake_case(name),
            capitalize(name)
        )
    }

    fn convert_type(&self, name: &str) -> String {
        self.scalars.convert(name)
    }

    fn format_name(&self, name: &str, _context: NameContext) -> String {
        match name {
            "ID" => "id".to_string(),
            other => other.to_string(),
        }
    }
}

impl Backend for RubyBackend {
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
        let module_path = self.module_path(message);

        let mut code = String::new();
        for depth in 1..module_path.len() {
            code.push_str(&format!("module {}; end\n", module_path[..depth].join("::")));
        }
        code.push_str(&format!("\nmodule {}\n", module_path.join("::")));
        code.push_str(&format!("  module {root_name}\n"));
        for line in header_lines(message) {
            code.push_str(&format!("    # {line}\n"));
        }
        code.push_str(&format!("    # generator version {}\n", message.version));

        for descriptor in projection.unique_types() {
            if descriptor.kind == DescriptorKind::Object
                && let Some(fragment) = &descriptor.add_on
            {
                code.push_str(fragment);
            }
        }
        code.push_str(&self.builder(
            "build",
            &root_name,
            &projection.root.fields,
            &projection.root.modifiers,
        ));
        code.push_str("  end\nend\n");

        debug!(message = %message.name, module = %module_path.join("::"), "generated ruby module");

        Ok(GeneratedCode {
            additional_code: enum_additional_code(&projection),
            ..GeneratedCode::new(code, root_name)
        })
    }

    fn post_process(&self, files: &mut Vec<FileDescriptor>, message_dir: &Path) {
        let (dir, code) = {
            let ruby_files: Vec<&FileDescriptor> = files_with_extension(EXTENSION, files).collect();
            let Some(dir) = extract_dir(ruby_files.iter().copied()) else {
                return;
            };
            let (_, enums) = aggregated_enums(EXTENSION, files);

            let mut code = format!("module {}; end\n\n", self.root_module);
            code.push_str(&format!("module {}::Enums\n", self.root_module));
            let enum_code: Vec<&str> = enums.iter().map(|e| e.code.as_str()).collect();
            code.push_str(&enum_code.join("\n"));
            code.push_str("end\n\nrequire \"date\"\n\nrequire_relative \"utils\"\nrequire_relative \"enums\"\n");
            for file in &ruby_files {
                let path = require_path(
                    &file.output_file_name,
                    message_dir,
                    &camel_to_snake_case(&file.path),
                );
                code.push_str(&format!("require_relative \"{path}\"\n"));
            }
            (dir.to_path_buf(), code)
        };

        let root_file = format!("{}.{EXTENSION}", self.root_file);
        debug!(file = %root_file, "writing ruby root require file");
        files.push(file_descriptor(&dir, &root_file, code));
        if self.static_dir.is_none() {
            files.extend(self.support_files(&dir));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::test_support::{address_schema, generate_files, new_address, new_location};

    fn backend() -> RubyBackend {
        RubyBackend::new(default_scalars(), &BackendOptions::default())
    }

    #[test]
    fn require_path___nested_message_file___relative_snake_path() {
        let path = require_path(
            Path::new("schema/foo/sub-directory/file-name.rb"),
            Path::new("schema/foo"),
            "Entity",
        );

        assert_eq!(path, "sub_directory/Entity/file_name");
    }

    #[test]
    fn require_path___empty_path___no_extra_directory() {
        let path = require_path(Path::new("messages/address/new-address.json"), Path::new("messages"), "");

        assert_eq!(path, "address/new_address");
    }

    #[test]
    fn generate___new_address___module_and_build() {
        let generated = backend().generate(&new_address(), &address_schema()).unwrap();
        let code = &generated.code;

        assert_eq!(generated.path, "NewAddress");
        assert!(code.starts_with("module PolyMsg; end\n\nmodule PolyMsg::Address\n  module NewAddress\n"));
        assert!(code.contains("    # New Address\n    # A new postal address\n    # generator version 1\n"));
        assert!(code.contains("\n    def self.build(street, city, state, zip)\n"));
        assert!(code.contains(
            "      raise(InvalidNewAddressError, \"Required value city is undefined\") if city.nil?\n"
        ));
        assert!(code.contains("    class InvalidNewAddressError < StandardError\n"));
    }

    #[test]
    fn generate___new_address___type_enum_and_pattern_checks() {
        let code = backend().generate(&new_address(), &address_schema()).unwrap().code;

        assert!(code.contains(
            "\"street must be an Array\") unless street.nil? || street.is_a?(Array)\n"
        ));
        assert!(code.contains(
            "\"Elements of street must be a String\") unless street.nil? || street.all? { |v| v.is_a?(String) }\n"
        ));
        assert!(code.contains(
            "\"Enum value #{state} is invalid\") unless state.nil? || PolyMsg::Enums.state_value_valid?(state)\n"
        ));
        assert!(code.contains(
            "\"Invalid zip value\") unless zip.nil? || zip.match?(/^[0-9]{5}(?:-[0-9]{4})?$/)\n"
        ));
    }

    #[test]
    fn generate___version_two___nested_builder_and_versioned_module() {
        let code = backend().generate(&new_location(), &address_schema()).unwrap().code;

        assert!(code.contains("module PolyMsg::Address::Geo; end\n"));
        assert!(code.contains("module PolyMsg::Address::Geo::V2\n  module NewLocation\n"));
        assert!(code.contains("\n    def self.Location(lat, lng)\n"));
        assert!(code.contains("\"lat must be a Numeric\") unless lat.nil? || lat.is_a?(Numeric)\n"));
        assert!(code.contains("\"location must be a Hash\") unless location.nil? || location.is_a?(Hash)\n"));
    }

    #[test]
    fn enum_def___camel_name___snake_validator() {
        let code = backend().enum_def("AccountType", &[EnumValue::new("BUSINESS"), EnumValue::new("CREATOR")]);

        assert!(code.starts_with("  ACCOUNT_TYPE = %i[BUSINESS CREATOR].freeze\n"));
        assert!(code.contains("  def self.account_type_value_valid?(v)\n"));
        assert!(code.contains("  class InvalidAccountTypeError < StandardError\n"));
    }

    #[test]
    fn format_name___id___lowercased() {
        assert_eq!(backend().format_name("ID", NameContext::Field), "id");
    }

    #[test]
    fn post_process___messages___root_file_with_enums_and_requires() {
        let files = generate_files(&backend(), &[new_address(), new_location()]).unwrap();

        let root = files
            .iter()
            .find(|f| f.output_file_name == Path::new("schemas"))
            .unwrap();
        assert_eq!(root.extension, "rb");
        assert_eq!(root.path, "");
        assert_eq!(root.code.matches("STATE = %i[CA NY TX].freeze").count(), 1);
        assert!(root.code.contains("require_relative \"utils\"\nrequire_relative \"enums\"\n"));
        assert!(root.code.contains("require_relative \"address/new_address/new_address\"\n"));
        assert!(root.code.contains("require_relative \"address/new_location/new_location\"\n"));
    }

    #[test]
    fn post_process___no_static_dir___bundles_support_files() {
        let options = BackendOptions {
            root_module: Some("Acme".to_string()),
            ..BackendOptions::default()
        };
        let backend = RubyBackend::new(default_scalars(), &options);

        let files = generate_files(&backend, &[new_address()]).unwrap();

        let enums = files
            .iter()
            .find(|f| f.output_file_name == Path::new("enums"))
            .unwrap();
        assert!(enums.code.contains("module Acme\n"));
        assert!(!enums.code.contains("PolyMsg"));
        assert!(files.iter().any(|f| f.output_file_name == Path::new("utils")));
    }

    #[test]
    fn post_process___static_dir___no_bundled_files() {
        let options = BackendOptions {
            static_dir: Some(PathBuf::from("static/ruby")),
            ..BackendOptions::default()
        };
        let backend = RubyBackend::new(default_scalars(), &options);

        let files = generate_files(&backend, &[new_address()]).unwrap();

        assert_eq!(files.len(), 2);
    }
}
