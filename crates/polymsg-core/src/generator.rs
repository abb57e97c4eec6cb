//! Backend contract.
//!
//! A backend plugs into projection through [`TypeEmitter`] (the callbacks
//! the engine invokes while walking a message) and into orchestration
//! through [`Backend`] (per-message generation plus an optional
//! cross-message post-processing step).
//!
//! ```ignore
//! struct MyEmitter { scalars: ScalarTable }
//!
//! impl TypeEmitter for MyEmitter {
//!     type Fragment = String;
//!     fn struct_def(&self, spec: &ObjectSpec, modifiers: &ModifierSets) -> ProjectionResult<String> { /* ... */ }
//!     fn enum_def(&self, name: &str, values: &[EnumValue]) -> String { /* ... */ }
//!     fn convert_type(&self, name: &str) -> String { self.scalars.convert(name) }
//! }
//!
//! let projection = project_message(&message, &schema, &emitter.scalars, &emitter)?;
//! ```

use crate::error::ProjectionResult;
use crate::modifiers::resolve_modifiers;
use crate::output::{AdditionalCode, FileDescriptor};
use crate::projection::{ModifierSets, ObjectSpec, Projection, ProjectionRequest, project};
use crate::scalars::ScalarTable;
use crate::schema::{EnumValue, Message, Schema};
use std::path::Path;

/// Where a name produced by [`TypeEmitter::format_name`] will be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameContext {
    /// Label of a scalar descriptor
    Scalar,
    /// Field name inside generated source
    Field,
    /// Field name inside serialized data (e.g. a JSON tag)
    Json,
}

/// Callbacks invoked by the projection engine
pub trait TypeEmitter {
    /// Generated code for one type
    type Fragment: Clone;

    /// Build the code of a projected object type
    fn struct_def(
        &self,
        spec: &ObjectSpec,
        modifiers: &ModifierSets,
    ) -> ProjectionResult<Self::Fragment>;

    /// Build the code of an enum
    fn enum_def(&self, name: &str, values: &[EnumValue]) -> Self::Fragment;

    /// Backend-native name for a primitive or type name
    fn convert_type(&self, name: &str) -> String;

    /// Backend-specific casing of a name
    fn format_name(&self, name: &str, _context: NameContext) -> String {
        name.to_string()
    }
}

/// A secondary file produced next to a message's primary file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalFile {
    /// File name replacing the message file name (without extension)
    pub name: String,
    /// Extension, defaulting to the backend's
    pub extension: Option<String>,
    pub code: String,
}

/// Result of generating one message with one backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedCode {
    pub code: String,
    /// Sub-directory inserted before the file name
    pub path: String,
    pub additional_file: Option<AdditionalFile>,
    /// Code blocks shared across messages, aggregated during post-processing
    pub additional_code: Vec<AdditionalCode>,
    pub imports: Vec<String>,
}

impl GeneratedCode {
    pub fn new(code: String, path: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            ..Self::default()
        }
    }
}

/// A code generation backend
pub trait Backend {
    /// Unique backend identifier (e.g. "go", "json-schema")
    fn id(&self) -> &str;

    /// File extension of generated files
    fn extension(&self) -> &str;

    /// Directory generated files are written under
    fn output_dir(&self) -> &Path;

    /// Directory of support files copied into the output directory
    fn static_dir(&self) -> Option<&Path> {
        None
    }

    /// Generate the code of one message
    fn generate(&self, message: &Message, schema: &Schema) -> ProjectionResult<GeneratedCode>;

    /// Final formatting applied to the primary file's code
    fn format_output(&self, code: String) -> String {
        code
    }

    /// Aggregate cross-message artifacts once every message was generated
    fn post_process(&self, _files: &mut Vec<FileDescriptor>, _message_dir: &Path) {}
}

/// Resolve the schema and project one message for one emitter.
///
/// The root type is the type of the message's schema entry point.
pub fn project_message<E>(
    message: &Message,
    schema: &Schema,
    scalars: &ScalarTable,
    emitter: &E,
) -> ProjectionResult<Projection<E::Fragment>>
where
    E: TypeEmitter + ?Sized,
{
    let root = schema.root_type(&message.name)?;
    let resolved = resolve_modifiers(&schema.definitions)?;
    project(
        &ProjectionRequest {
            message,
            schema: &resolved,
            root,
            scalars,
        },
        emitter,
    )
}
