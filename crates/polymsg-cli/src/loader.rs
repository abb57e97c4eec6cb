//! Schema and message document loading

use anyhow::{Context, Result};
use polymsg_core::{Message, Schema};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

/// A message document that was not loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub file: PathBuf,
    pub reason: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.reason)
    }
}

#[derive(Debug, Default)]
pub struct LoadedMessages {
    pub messages: Vec<Message>,
    pub rejected: Vec<Rejection>,
}

pub fn load_schema(path: &Path) -> Result<Schema> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema: {:?}", path))?;
    let schema = Schema::from_json(&content)
        .with_context(|| format!("Failed to parse schema: {:?}", path))?;

    debug!(
        definitions = schema.definitions.len(),
        entry_points = schema.entry_points.len(),
        "loaded schema"
    );
    Ok(schema)
}

/// `*.json` files under `dir`, sorted by path
pub fn message_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("Message directory not found: {:?}", dir);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", dir))?;
        let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Load every message document under `dir`.
///
/// Documents that fail to parse, and messages that are not entry points of
/// `schema`, are logged and returned as rejections.
pub fn load_messages(dir: &Path, schema: &Schema) -> Result<LoadedMessages> {
    let mut loaded = LoadedMessages::default();

    for file in message_files(dir)? {
        let content = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read message: {:?}", file))?;

        match Message::from_json(&content, &file) {
            Ok(message) if schema.entry_point(&message.name).is_some() => {
                debug!(message = %message.name, file = %file.display(), "loaded message");
                loaded.messages.push(message);
            }
            Ok(message) => {
                let reason = format!("{} is not defined in the schema", message.name);
                error!("{reason}");
                loaded.rejected.push(Rejection { file, reason });
            }
            Err(err) => {
                error!(file = %file.display(), "invalid message document: {err}");
                loaded.rejected.push(Rejection {
                    file,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(loaded)
}
