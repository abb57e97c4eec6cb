//! Python class generation.
//!
//! One module per message: a fixed preamble of converter functions, one
//! validator per named scalar of the table, then a class per projected
//! object and the root class. Classes validate in `__init__` and convert
//! through `from_dict`/`to_dict`.

use crate::options::BackendOptions;
use crate::support::{header_lines, quoted};
use polymsg_core::naming::capitalize;
use polymsg_core::projection::{FieldType, ModifierSets, ObjectSpec, ProjectedField};
use polymsg_core::schema::EnumValue;
use polymsg_core::{
    ANY_SCALAR, Backend, GeneratedCode, Message, ProjectionResult, ScalarDef, ScalarTable, Schema,
    TypeEmitter, project_message,
};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ID: &str = "python";
const EXTENSION: &str = "py";
const INDENT: &str = "    ";

const IMPORTS: &str = "import re
import datetime
from dateutil import parser as dateutil_parser
from typing import Any, Callable, List, Literal, Optional, TypeVar, Union
";

const PREAMBLE: &str = r#"T = TypeVar("T")


def from_str(x: Any) -> str:
    if x is None: return None
    assert isinstance(x, str)
    return x


def from_int(x: Any) -> int:
    if x is None: return None
    assert isinstance(x, int) and not isinstance(x, bool)
    return x


def from_float(x: Any) -> float:
    if x is None: return None
    assert isinstance(x, (float, int)) and not isinstance(x, bool)
    return float(x)


def from_bool(x: Any) -> bool:
    if x is None: return None
    assert isinstance(x, bool)
    return x


def from_list(f: Callable[[Any], T], x: Any) -> List[T]:
    if x is None: return None
    assert isinstance(x, list)
    return [f(y) for y in x]


def is_required(x: Any) -> Any:
    assert x is not None
    return x
"#;

const FROM_ANY: &str = "

def from_Any(x: Any) -> Any:
    return x
";

/// Built-in Python scalar table
pub fn default_scalars() -> ScalarTable {
    ScalarTable::new()
        .with_scalar(
            "ISODate",
            ScalarDef::new("datetime.date").with_input("str", "datetime.date.fromisoformat"),
        )
        .with_scalar(
            "DateTime",
            ScalarDef::new("datetime.datetime").with_input("str", "dateutil_parser.isoparse"),
        )
        .with_scalar("CurrencyCent", ScalarDef::new("int"))
        .with_scalar("Any", ScalarDef::new("dict"))
        .with_scalar(
            "UUID",
            ScalarDef::new("str")
                .with_pattern("^[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$"),
        )
        .with_scalar("Phone", ScalarDef::new("str").with_pattern(r"^\+?[1-9]\d{1,14}$"))
        .with_scalar("ZIPCode", ScalarDef::new("str").with_pattern("^[0-9]{5}(?:-[0-9]{4})?$"))
        .with_scalar("Email", ScalarDef::new("str"))
        .with_conversion("String", "str")
        .with_conversion("ID", "str")
        .with_conversion("Int", "int")
        .with_conversion("Float", "float")
        .with_conversion("Boolean", "bool")
}

#[derive(Debug, Clone)]
pub struct PythonBackend {
    scalars: ScalarTable,
    output_dir: PathBuf,
    static_dir: Option<PathBuf>,
}

impl PythonBackend {
    pub fn new(scalars: ScalarTable, options: &BackendOptions) -> Self {
        Self {
            scalars,
            output_dir: options.output_dir(ID),
            static_dir: options.static_dir.clone(),
        }
    }

    fn scalar_validators(&self) -> String {
        let mut code = String::new();
        for (name, def) in self.scalars.named_scalars() {
            code.push_str("\n\n");
            if let Some(pattern) = &def.pattern {
                code.push_str(&format!("{name}_pattern = re.compile({})\n\n\n", quoted(pattern)));
            }
            let ty = def.ty.to_string();
            let input = match &def.input_type {
                Some(input) => format!("Union[{input}, {ty}]"),
                None => "Any".to_string(),
            };
            code.push_str(&format!("def from_{name}(x: {input}) -> {ty}:\n"));
            code.push_str(&format!("{INDENT}if x is None: return None\n"));
            match (&def.input_type, &def.instantiate) {
                (Some(input), Some(instantiate)) => code.push_str(&format!(
                    "{INDENT}if isinstance(x, {input}): x = {instantiate}(x)\n"
                )),
                (None, Some(instantiate)) => {
                    code.push_str(&format!("{INDENT}x = {instantiate}(x)\n"))
                }
                _ => {}
            }
            code.push_str(&format!("{INDENT}assert isinstance(x, {ty})\n"));
            if def.pattern.is_some() {
                code.push_str(&format!("{INDENT}assert {name}_pattern.match(x)\n"));
            }
            code.push_str(&format!("{INDENT}return x\n"));
        }
        code
    }

    fn class_code(&self, name: &str, fields: &[ProjectedField], modifiers: &ModifierSets) -> String {
        let i1 = INDENT;
        let i2 = INDENT.repeat(2);
        let mut code = String::new();

        let params: Vec<String> = fields
            .iter()
            .map(|f| {
                let hint = type_hint(f);
                if modifiers.is_required(&f.name) {
                    format!("{}: {hint}", f.name)
                } else {
                    format!("{}: Optional[{hint}] = None", f.name)
                }
            })
            .collect();

        code.push_str(&format!("\n\nclass {name}:\n"));
        if params.is_empty() {
            code.push_str(&format!("{i1}def __init__(self) -> None:\n{i2}pass\n"));
        } else {
            code.push_str(&format!(
                "{i1}def __init__(self, *, {}) -> None:\n",
                params.join(", ")
            ));
            for field in fields {
                for check in init_checks(field, modifiers.is_required(&field.name)) {
                    code.push_str(&format!("{i2}{check}\n"));
                }
            }
            for field in fields {
                code.push_str(&format!("{i2}self.{0} = {0}\n", field.name));
            }
        }

        code.push_str(&format!("\n{i1}@staticmethod\n{i1}def from_dict(obj: Any) -> '{name}':\n"));
        code.push_str(&format!("{i2}if obj is None: return None\n"));
        code.push_str(&format!("{i2}assert isinstance(obj, dict)\n"));
        for field in fields.iter().filter(|f| modifiers.is_required(&f.name)) {
            code.push_str(&format!("{i2}is_required(obj.get(\"{}\"))\n", field.name));
        }
        for field in fields {
            let value = format!("obj.get(\"{}\")", field.name);
            let converted = match (&field.ty, field.modifiers.array) {
                (FieldType::Object(object), false) => format!("{object}.from_dict({value})"),
                (FieldType::Object(object), true) => format!("from_list({object}.from_dict, {value})"),
                (_, true) => format!("from_list({}, {value})", converter(field)),
                (_, false) => format!("{}({value})", converter(field)),
            };
            code.push_str(&format!("{i2}{} = {converted}\n", field.name));
        }
        let arguments: Vec<String> = fields.iter().map(|f| format!("{0}={0}", f.name)).collect();
        code.push_str(&format!("{i2}return {name}({})\n", arguments.join(", ")));

        code.push_str(&format!("\n{i1}def to_dict(self) -> dict:\n{i2}result: dict = {{}}\n"));
        for field in fields {
            let value = format!("self.{}", field.name);
            let converted = match (&field.ty, field.modifiers.array) {
                (FieldType::Object(_), false) if modifiers.is_required(&field.name) => {
                    format!("{value}.to_dict()")
                }
                (FieldType::Object(_), false) => {
                    format!("None if {value} is None else {value}.to_dict()")
                }
                (FieldType::Object(_), true) => format!("from_list(lambda x: x.to_dict(), {value})"),
                (_, true) => format!("from_list({}, {value})", converter(field)),
                (_, false) => format!("{}({value})", converter(field)),
            };
            code.push_str(&format!("{i2}result[\"{}\"] = {converted}\n", field.name));
        }
        code.push_str(&format!("{i2}return result\n"));

        code.push_str(&format!(
            "\n\ndef from_{name}(x: Any) -> {name}:\n{i1}if x is None: return None\n{i1}assert isinstance(x, {name})\n{i1}return x\n"
        ));
        code
    }
}

/// Python type of one value of `field`
fn value_type(field: &ProjectedField) -> String {
    match &field.ty {
        FieldType::Builtin { native, .. } | FieldType::Enum { native, .. } => native.clone(),
        FieldType::Scalar(scalar) => scalar.def.ty.to_string(),
        FieldType::Object(name) => name.clone(),
    }
}

fn type_hint(field: &ProjectedField) -> String {
    if field.modifiers.array {
        format!("List[{}]", value_type(field))
    } else {
        value_type(field)
    }
}

/// Converter function for one value of a non-object field
fn converter(field: &ProjectedField) -> String {
    match &field.ty {
        FieldType::Builtin { native, .. } | FieldType::Enum { native, .. } => format!("from_{native}"),
        FieldType::Scalar(scalar) => format!("from_{}", scalar.name),
        FieldType::Object(name) => format!("from_{name}"),
    }
}

/// `__init__` checks: presence, list elements, enum membership, scalar pattern
fn init_checks(field: &ProjectedField, required: bool) -> Vec<String> {
    let mut checks = Vec::new();
    if required {
        checks.push(format!("is_required({})", field.name));
    }
    if field.modifiers.array {
        checks.push(format!("from_list({}, {})", converter(field), field.name));
    } else if matches!(field.ty, FieldType::Enum { .. }) || field.pattern().is_some() {
        checks.push(format!("{}({})", converter(field), field.name));
    }
    checks
}

impl TypeEmitter for PythonBackend {
    type Fragment = String;

    fn struct_def(&self, spec: &ObjectSpec, modifiers: &ModifierSets) -> ProjectionResult<String> {
        Ok(self.class_code(&spec.name, &spec.fields, modifiers))
    }

    fn enum_def(&self, name: &str, values: &[EnumValue]) -> String {
        let literals: Vec<String> = values.iter().map(|v| quoted(&v.name)).collect();
        let literals = literals.join(", ");
        format!(
            "\n\n{name} = Literal[{literals}]\n\n\ndef from_{name}(x: Any) -> {name}:\n{INDENT}if x is None: return None\n{INDENT}assert x in [{literals}]\n{INDENT}return x\n"
        )
    }

    fn convert_type(&self, name: &str) -> String {
        self.scalars.convert(name)
    }
}

impl Backend for PythonBackend {
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

        let mut root_name = capitalize(&message.name);
        if message.version > 1 {
            root_name.push_str(&format!("_V{}", message.version));
        }

        let mut code = String::from(IMPORTS);
        code.push('\n');
        if !message.namespace.is_empty() {
            code.push_str(&format!("# {}\n\n", message.namespace));
        }
        for line in header_lines(message) {
            code.push_str(&format!("# {line}\n"));
        }
        code.push_str(&format!("# generator version {}\n\n", message.version));

        code.push_str(PREAMBLE);
        if self.scalars.scalar(ANY_SCALAR).is_none() {
            code.push_str(FROM_ANY);
        }
        code.push_str(&self.scalar_validators());

        for descriptor in projection.unique_types() {
            if let Some(fragment) = &descriptor.add_on {
                code.push_str(fragment);
            }
        }
        code.push_str(&self.class_code(
            &root_name,
            &projection.root.fields,
            &projection.root.modifiers,
        ));

        debug!(message = %message.name, class = %root_name, "generated python module");

        Ok(GeneratedCode::new(code, root_name))
    }
}
