//! Writes file descriptors to disk

use anyhow::{Context, Result};
use polymsg_core::FileDescriptor;
use polymsg_core::naming::{camel_to_snake_case, kebab_to_snake};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Final location of a file descriptor.
///
/// The origin file name is made relative to `message_dir`, snake-cased and
/// stripped of its extension, then placed under `to_dir` with `path` (when
/// set) as an extra directory before the file name:
/// `messages/address/new-address.json` with path `newAddress` becomes
/// `<to_dir>/address/new_address/new_address.<ext>`.
pub fn output_path(file: &FileDescriptor, message_dir: &Path) -> PathBuf {
    let relative = file
        .output_file_name
        .strip_prefix(message_dir)
        .unwrap_or(&file.output_file_name);

    let mut target = file.to_dir.clone();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            target.push(kebab_to_snake(&component.as_os_str().to_string_lossy()));
        }
    }
    if !file.path.is_empty() {
        target.push(camel_to_snake_case(&file.path));
    }

    let stem = relative
        .file_stem()
        .map(|s| kebab_to_snake(&s.to_string_lossy()))
        .unwrap_or_default();
    if file.extension.is_empty() {
        target.push(stem);
    } else {
        target.push(format!("{stem}.{}", file.extension));
    }
    target
}

/// Write every file, creating parent directories and overwriting existing files
pub fn write_files(files: &[FileDescriptor], message_dir: &Path) -> Result<Vec<PathBuf>> {
    files
        .iter()
        .map(|file| {
            let path = output_path(file, message_dir);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
            fs::write(&path, &file.code)
                .with_context(|| format!("Failed to write {:?}", path))?;
            debug!(path = %path.display(), bytes = file.code.len(), "wrote file");
            Ok(path)
        })
        .collect()
}

/// Copy the contents of `static_dir` into `to_dir`, keeping sub-directories
pub fn copy_static_dir(static_dir: &Path, to_dir: &Path) -> Result<usize> {
    if !static_dir.is_dir() {
        anyhow::bail!("Static directory not found: {:?}", static_dir);
    }

    let mut copied = 0;
    for entry in WalkDir::new(static_dir) {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", static_dir))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(static_dir)
            .with_context(|| format!("{:?} is outside {:?}", entry.path(), static_dir))?;
        let target = to_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        fs::copy(entry.path(), &target)
            .with_context(|| format!("Failed to copy {:?} to {:?}", entry.path(), target))?;
        copied += 1;
    }

    debug!(from = %static_dir.display(), to = %to_dir.display(), copied, "copied static files");
    Ok(copied)
}
