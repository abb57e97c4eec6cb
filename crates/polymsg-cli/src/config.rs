//! polymsg.toml parsing

use anyhow::{Context, Result};
use indexmap::IndexMap;
use polymsg_backends::{BackendOptions, backend_ids};
use polymsg_core::{ScalarDef, ScalarTable, TypeName};
use polymsg_logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file used when `--config` is not given
pub const DEFAULT_CONFIG: &str = "polymsg.toml";

/// polymsg.toml structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Schema document (AST JSON)
    #[serde(default = "default_schema")]
    pub schema: PathBuf,

    /// Directory searched for message documents
    #[serde(default = "default_messages")]
    pub messages: PathBuf,

    /// Exit non-zero when any message fails
    #[serde(default)]
    pub strict: bool,

    #[serde(default)]
    pub logging: LoggingSection,

    /// Backends to run, keyed by id. Absent means every compiled backend.
    #[serde(default = "default_backends")]
    pub backends: IndexMap<String, BackendOptions>,

    /// Scalar overrides merged over each backend's built-in table
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub scalars: IndexMap<String, ScalarOverrides>,
}

/// `[scalars.<id>]`: scalar entries keyed by name plus an optional `converter` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarOverrides {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub converter: IndexMap<String, TypeName>,

    #[serde(flatten)]
    pub scalars: IndexMap<String, ScalarDef>,
}

impl From<ScalarOverrides> for ScalarTable {
    fn from(overrides: ScalarOverrides) -> Self {
        ScalarTable {
            scalars: overrides.scalars,
            converter: overrides.converter,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub level: LogLevel,
}

fn default_schema() -> PathBuf {
    PathBuf::from("schema.json")
}

fn default_messages() -> PathBuf {
    PathBuf::from("messages")
}

fn default_backends() -> IndexMap<String, BackendOptions> {
    backend_ids()
        .into_iter()
        .map(|id| (id.to_string(), BackendOptions::default()))
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            messages: default_messages(),
            strict: false,
            logging: LoggingSection::default(),
            backends: default_backends(),
            scalars: IndexMap::new(),
        }
    }
}

impl Config {
    /// Load config from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config: {:?}", path.as_ref()))?;

        Self::from_str(&content)
            .with_context(|| format!("Invalid config: {:?}", path.as_ref()))
    }

    /// Parse config from string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Load the given config, or the default file when present, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG).exists() => Self::from_file(DEFAULT_CONFIG),
            None => {
                tracing::debug!("no {DEFAULT_CONFIG} found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Scalar overrides for one backend, as a table
    pub fn scalar_overrides(&self, id: &str) -> Option<ScalarTable> {
        self.scalars.get(id).cloned().map(ScalarTable::from)
    }

    /// Backends selected for a run.
    ///
    /// With an explicit `only` list those ids run in the given order, whether
    /// or not they are enabled or configured. Otherwise every enabled backend
    /// of the config runs in config order.
    pub fn selected_backends(&self, only: &[String]) -> Vec<(String, BackendOptions)> {
        if only.is_empty() {
            self.backends
                .iter()
                .filter(|(_, options)| options.enabled)
                .map(|(id, options)| (id.clone(), options.clone()))
                .collect()
        } else {
            only.iter()
                .map(|id| (id.clone(), self.backends.get(id).cloned().unwrap_or_default()))
                .collect()
        }
    }
}
