//! # polymsg
//!
//! Generate validated message types for several languages from one GraphQL
//! schema.
//!
//! A schema and a set of message documents (graphql-js AST JSON) go in. Each
//! message selects part of the schema graph; polymsg projects the minimal set
//! of types that selection needs and hands them to each backend:
//! - Go structs with `Validate()` methods
//! - Python classes with `from_dict`/`to_dict`
//! - Ruby builder modules
//! - JSON Schema documents
//! - Protobuf messages
//!
//! ## Quick Start
//!
//! ```ignore
//! use polymsg::prelude::*;
//! use std::path::Path;
//!
//! let schema = Schema::from_json(&std::fs::read_to_string("schema.json")?)?;
//! let message = Message::from_json(
//!     &std::fs::read_to_string("messages/address/new-address.json")?,
//!     "messages/address/new-address.json",
//! )?;
//!
//! let backends = vec![create_backend("go", &BackendOptions::default(), None)?];
//! let report = generate_all(&[message], &schema, &backends, Path::new("messages"));
//! for failure in &report.failures {
//!     eprintln!("{failure}");
//! }
//! ```
//!
//! ## Writing a Backend
//!
//! Implement [`TypeEmitter`] for the projection callbacks and [`Backend`]
//! for the per-message file, then call [`project_message`] from
//! [`Backend::generate`].
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`polymsg_core`] - Schema model, projection engine and backend traits
//! - [`polymsg_backends`] - The built-in backends
//! - [`polymsg_logging`] - Subscriber setup with a reloadable level

// Re-export core types
pub use polymsg_core::{
    AdditionalCode, Backend, DocumentError, DocumentResult, FileDescriptor, GeneratedCode,
    GenerationFailure, GenerationReport, Message, NameContext, ObjectSpec, ProjectionError,
    ProjectionResult, ScalarDef, ScalarTable, Schema, Selection, TypeEmitter, TypeName,
    generate_all, project, project_message, resolve_modifiers,
};

// Re-export core modules for backend authors
pub use polymsg_core::{naming, output, projection, schema};

// Re-export backends
pub use polymsg_backends::{
    BackendError, BackendOptions, BackendResult, backend_ids, create_backend, default_scalars,
};

// Re-export logging
pub use polymsg_logging::{LogLevel, ReloadHandle, init_logging};

// Re-export common dependencies that backend authors need
pub use serde_json;
pub use tracing;

/// Prelude module for convenient imports.
///
/// Use `use polymsg::prelude::*;` to import commonly used types.
pub mod prelude {
    pub use crate::{
        Backend, BackendOptions, FileDescriptor, GeneratedCode, Message, NameContext, ObjectSpec,
        ProjectionResult, ScalarDef, ScalarTable, Schema, TypeEmitter, create_backend,
        generate_all, project_message,
    };
}
