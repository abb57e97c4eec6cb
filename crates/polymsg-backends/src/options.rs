//! Per-backend settings, as read from the `[backends.<id>]` config tables

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings shared by every backend plus the options specific to some.
///
/// Backend-specific fields are ignored by backends that do not use them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendOptions {
    /// Whether the backend runs during `generate`
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Output directory, defaulting to `output/<id>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Support files copied into the output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,

    /// Go module path the enums package is imported from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_path: Option<String>,

    /// Ruby module wrapping every generated module
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_module: Option<String>,

    /// Ruby root require file name, without extension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_file: Option<String>,

    /// Prefix of JSON Schema `$id`s
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri_scheme: Option<String>,

    /// JSON Schema `$schema` value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,

    /// Protobuf package prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_root: Option<String>,

    /// Prefix of the protobuf `go_package` option
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_package_prefix: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            output: None,
            static_dir: None,
            module_path: None,
            root_module: None,
            root_file: None,
            uri_scheme: None,
            schema_version: None,
            package_root: None,
            go_package_prefix: None,
        }
    }
}

impl BackendOptions {
    /// Output directory for backend `id`
    pub fn output_dir(&self, id: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from("output").join(id))
    }
}
