//! polymsg-core - Schema model, modifier resolution and projection engine
//!
//! This crate provides everything a code generation backend builds on:
//! - [`Schema`] and [`Message`] loaded from query-language AST JSON
//! - [`resolve_modifiers`] to flatten type expressions and merge extensions
//! - [`project`] to compute the types a message needs
//! - [`Backend`] and [`TypeEmitter`] traits implemented by each backend
//! - [`generate_all`] to run a batch over messages and backends

pub mod ast;
mod error;
pub mod generator;
pub mod modifiers;
pub mod naming;
pub mod orchestrator;
pub mod output;
pub mod projection;
pub mod scalars;
pub mod schema;

pub use error::{DocumentError, DocumentResult, ProjectionError, ProjectionResult, ScalarTableError};
pub use generator::{
    AdditionalFile, Backend, GeneratedCode, NameContext, TypeEmitter, project_message,
};
pub use modifiers::{ResolvedSchema, resolve_modifiers};
pub use orchestrator::{GenerationFailure, GenerationReport, generate_all};
pub use output::{AdditionalCode, FileDescriptor};
pub use projection::{
    ANY_SCALAR, FieldType, ModifierSets, ObjectSpec, ProjectedField, Projection, ProjectionRequest,
    TypeDescriptor, project,
};
pub use scalars::{ScalarDef, ScalarTable, TypeName};
pub use schema::{Directives, EnumValue, Message, Schema, Selection};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AdditionalCode, Backend, FileDescriptor, GeneratedCode, Message, NameContext, ObjectSpec,
        ProjectionError, ProjectionResult, ScalarDef, ScalarTable, Schema, TypeEmitter,
        generate_all,
    };
}
