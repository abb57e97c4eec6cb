//! polymsg-backends - Code generation backends
//!
//! Every backend implements [`TypeEmitter`](polymsg_core::TypeEmitter) for
//! the projection callbacks and [`Backend`] for per-message generation and
//! cross-message post-processing. Each one is behind a cargo feature of the
//! same name; all are enabled by default.
//!
//! Backends are created by id through [`create_backend`], which overlays
//! configured scalar overrides on the backend's built-in table.

mod options;
mod support;

#[cfg(test)]
mod test_support;

#[cfg(feature = "go")]
pub mod go;

#[cfg(feature = "go")]
pub use go::GoBackend;

#[cfg(feature = "python")]
pub mod python;

#[cfg(feature = "python")]
pub use python::PythonBackend;

#[cfg(feature = "ruby")]
pub mod ruby;

#[cfg(feature = "ruby")]
pub use ruby::RubyBackend;

#[cfg(feature = "json-schema")]
pub mod json_schema;

#[cfg(feature = "json-schema")]
pub use json_schema::JsonSchemaBackend;

#[cfg(feature = "protobuf")]
pub mod protobuf;

#[cfg(feature = "protobuf")]
pub use protobuf::ProtobufBackend;

pub use options::BackendOptions;

use polymsg_core::{Backend, ScalarTable, ScalarTableError};
use thiserror::Error;
use tracing::debug;

/// Result type alias for backend construction
pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// No backend with this id is compiled in
    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    /// The merged scalar table is invalid
    #[error("invalid scalar table: {0}")]
    InvalidScalars(#[from] ScalarTableError),
}

/// Ids of the backends compiled into this build, in generation order
pub fn backend_ids() -> Vec<&'static str> {
    let mut ids = Vec::new();

    #[cfg(feature = "go")]
    ids.push(go::ID);

    #[cfg(feature = "python")]
    ids.push(python::ID);

    #[cfg(feature = "ruby")]
    ids.push(ruby::ID);

    #[cfg(feature = "json-schema")]
    ids.push(json_schema::ID);

    #[cfg(feature = "protobuf")]
    ids.push(protobuf::ID);

    ids
}

/// Built-in scalar table of backend `id`
pub fn default_scalars(id: &str) -> BackendResult<ScalarTable> {
    match id {
        #[cfg(feature = "go")]
        go::ID => Ok(go::default_scalars()),
        #[cfg(feature = "python")]
        python::ID => Ok(python::default_scalars()),
        #[cfg(feature = "ruby")]
        ruby::ID => Ok(ruby::default_scalars()),
        #[cfg(feature = "json-schema")]
        json_schema::ID => Ok(json_schema::default_scalars()),
        #[cfg(feature = "protobuf")]
        protobuf::ID => Ok(protobuf::default_scalars()),
        other => Err(BackendError::UnknownBackend(other.to_string())),
    }
}

/// Create backend `id` from its options.
///
/// `overrides` entries replace built-in scalar entries of the same name;
/// the merged table must have valid patterns.
pub fn create_backend(
    id: &str,
    options: &BackendOptions,
    overrides: Option<&ScalarTable>,
) -> BackendResult<Box<dyn Backend>> {
    let mut scalars = default_scalars(id)?;
    if let Some(overrides) = overrides {
        scalars.merge(overrides.clone());
    }
    scalars.validate()?;

    debug!(backend = id, scalars = scalars.scalars.len(), "creating backend");

    let backend: Box<dyn Backend> = match id {
        #[cfg(feature = "go")]
        go::ID => Box::new(GoBackend::new(scalars, options)),
        #[cfg(feature = "python")]
        python::ID => Box::new(PythonBackend::new(scalars, options)),
        #[cfg(feature = "ruby")]
        ruby::ID => Box::new(RubyBackend::new(scalars, options)),
        #[cfg(feature = "json-schema")]
        json_schema::ID => Box::new(JsonSchemaBackend::new(scalars, options)),
        #[cfg(feature = "protobuf")]
        protobuf::ID => Box::new(ProtobufBackend::new(scalars, options)),
        other => return Err(BackendError::UnknownBackend(other.to_string())),
    };
    Ok(backend)
}
