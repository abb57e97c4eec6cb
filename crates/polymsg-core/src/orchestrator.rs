//! Batch generation over every (message, backend) pair

use crate::error::ProjectionError;
use crate::generator::Backend;
use crate::output::{FileDescriptor, generated_code};
use crate::schema::{Message, Schema};
use std::fmt;
use std::path::Path;
use tracing::{debug, error, info};

/// A (message, backend) pair whose generation failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    pub message: String,
    pub backend: String,
    pub error: ProjectionError,
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Message {} specification is incorrect: {}",
            self.message, self.error
        )
    }
}

/// Outcome of a batch: every produced file plus the failed pairs
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub files: Vec<FileDescriptor>,
    pub failures: Vec<GenerationFailure>,
}

impl GenerationReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Generate every message with every backend, then run each backend's post-processing.
///
/// Messages are processed in order, and for each message the backends in
/// order. A failing pair is logged and recorded; it never stops the batch.
pub fn generate_all(
    messages: &[Message],
    schema: &Schema,
    backends: &[Box<dyn Backend>],
    message_dir: &Path,
) -> GenerationReport {
    let mut report = GenerationReport::default();

    for message in messages {
        info!(message = %message.name, "processing message");
        for backend in backends {
            match backend.generate(message, schema) {
                Ok(generated) => {
                    debug!(message = %message.name, backend = backend.id(), "generated");
                    report
                        .files
                        .extend(generated_code(message, backend.as_ref(), generated));
                }
                Err(err) => {
                    let failure = GenerationFailure {
                        message: message.name.clone(),
                        backend: backend.id().to_string(),
                        error: err,
                    };
                    error!(backend = %failure.backend, "{failure}");
                    report.failures.push(failure);
                }
            }
        }
    }

    for backend in backends {
        backend.post_process(&mut report.files, message_dir);
    }

    info!(
        files = report.files.len(),
        failures = report.failures.len(),
        "generation finished"
    );
    report
}
