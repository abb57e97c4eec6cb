//! Error types for schema loading and projection

use thiserror::Error;

/// Result type alias for projection operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Result type alias for document loading
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Error raised while projecting one message for one backend.
///
/// Every variant is scoped to a single (message, backend) pair: the
/// orchestrator records it and moves on to the next pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    /// A schema scalar has no entry in the backend's scalar table
    #[error("scalar type not defined: {0}")]
    ScalarNotDefined(String),

    /// A referenced type or field cannot be resolved against the schema
    #[error("invalid type {type_name} and/or {field}")]
    InvalidType { type_name: String, field: String },

    /// An object extension names a type that has no base definition
    #[error("extension target not found: {0}")]
    ExtensionTargetNotFound(String),

    /// The message's entry point names a type missing from the schema
    #[error("root type not found: {0}")]
    RootTypeNotFound(String),

    /// The message is not declared as a schema entry point
    #[error("{0} is not defined in the schema")]
    MessageNotDefined(String),

    /// An object type is reachable from itself through the selection tree
    #[error("circular reference through type {0}")]
    CircularReference(String),

    /// A backend that orders fields found a field without an order annotation
    #[error("field {field} of {type_name} has no order annotation")]
    MissingFieldOrder { type_name: String, field: String },

    /// Generated output could not be serialized
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Error raised while turning a parsed document into a schema or message
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document is not valid AST JSON
    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),

    /// A message document has no query operation
    #[error("message document has no query operation")]
    NoQueryOperation,

    /// The query operation selects nothing
    #[error("message document query has no selection")]
    EmptyQuery,

    /// The message declares a version below 1
    #[error("message {message} has invalid version {version}")]
    InvalidVersion { message: String, version: i64 },
}

/// Error raised while validating a scalar table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScalarTableError {
    #[error("scalar {scalar} has an invalid pattern: {reason}")]
    InvalidPattern { scalar: String, reason: String },
}
