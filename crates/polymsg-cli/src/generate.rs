//! Generate command implementation

use crate::config::Config;
use crate::loader::{LoadedMessages, load_messages, load_schema};
use crate::writer::{copy_static_dir, write_files};
use anyhow::{Context, Result};
use polymsg_backends::create_backend;
use polymsg_core::{Backend, GenerationReport, Schema, generate_all};
use std::path::PathBuf;
use tracing::info;

/// Command line overrides of config values
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub schema: Option<PathBuf>,
    pub messages: Option<PathBuf>,
    pub backends: Vec<String>,
}

/// Everything a run needs, loaded and validated
pub struct Batch {
    pub schema: Schema,
    pub loaded: LoadedMessages,
    pub backends: Vec<Box<dyn Backend>>,
    pub message_dir: PathBuf,
}

impl Batch {
    pub fn prepare(config: &Config, inputs: &Inputs) -> Result<Self> {
        let backends = create_backends(config, &inputs.backends)?;
        let schema_path = inputs.schema.clone().unwrap_or_else(|| config.schema.clone());
        let message_dir = inputs
            .messages
            .clone()
            .unwrap_or_else(|| config.messages.clone());

        let schema = load_schema(&schema_path)?;
        let loaded = load_messages(&message_dir, &schema)?;
        info!(
            messages = loaded.messages.len(),
            rejected = loaded.rejected.len(),
            backends = backends.len(),
            "loaded inputs"
        );

        Ok(Self {
            schema,
            loaded,
            backends,
            message_dir,
        })
    }

    pub fn generate(&self) -> GenerationReport {
        generate_all(
            &self.loaded.messages,
            &self.schema,
            &self.backends,
            &self.message_dir,
        )
    }

    /// Print every rejected document and failed pair; returns their count
    pub fn report_problems(&self, report: &GenerationReport) -> usize {
        for rejection in &self.loaded.rejected {
            println!("✗ {rejection}");
        }
        for failure in &report.failures {
            println!("✗ [{}] {failure}", failure.backend);
        }
        self.loaded.rejected.len() + report.failures.len()
    }
}

/// Instantiate the selected backends with their scalar overrides
pub fn create_backends(config: &Config, only: &[String]) -> Result<Vec<Box<dyn Backend>>> {
    let selected = config.selected_backends(only);
    if selected.is_empty() {
        anyhow::bail!("No backends enabled; enable one in the config or pass --backend");
    }

    selected
        .into_iter()
        .map(|(id, options)| {
            let overrides = config.scalar_overrides(&id);
            create_backend(&id, &options, overrides.as_ref())
                .with_context(|| format!("Failed to create backend '{id}'"))
        })
        .collect()
}

/// Result of a generate run
#[derive(Debug)]
pub struct Outcome {
    pub written: Vec<PathBuf>,
    pub problems: usize,
}

pub fn generate(config: &Config, inputs: &Inputs) -> Result<Outcome> {
    let batch = Batch::prepare(config, inputs)?;
    let report = batch.generate();

    let written = write_files(&report.files, &batch.message_dir)?;
    for backend in &batch.backends {
        if let Some(static_dir) = backend.static_dir() {
            copy_static_dir(static_dir, backend.output_dir())
                .with_context(|| format!("Failed to copy static files for '{}'", backend.id()))?;
        }
    }

    let problems = batch.report_problems(&report);
    println!(
        "✓ Wrote {} files for {} messages with {} backends",
        written.len(),
        batch.loaded.messages.len(),
        batch.backends.len()
    );
    if problems > 0 {
        println!("✗ {problems} problem(s) found");
    }

    Ok(Outcome { written, problems })
}

/// Generate command implementation
pub fn run(config: &Config, inputs: &Inputs, strict: bool) -> Result<()> {
    let outcome = generate(config, inputs)?;

    if (strict || config.strict) && outcome.problems > 0 {
        anyhow::bail!("{} problem(s) found in strict mode", outcome.problems);
    }
    Ok(())
}
