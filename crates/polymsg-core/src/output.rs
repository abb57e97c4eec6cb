//! Output assembly: file descriptors and cross-message code aggregation

use crate::generator::{Backend, GeneratedCode};
use crate::naming::split_by_last;
use crate::schema::Message;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A code block shared across messages, keyed by the type it defines
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdditionalCode {
    #[serde(rename = "type")]
    pub type_name: String,
    pub code: String,
}

impl AdditionalCode {
    pub fn new(type_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            code: code.into(),
        }
    }
}

/// One file to be written.
///
/// `output_file_name` is either the origin message file (for per-message
/// files) or a bare name relative to the message directory (for files
/// created during post-processing). The writer combines it with `to_dir`,
/// `path` and `extension` into the final location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    pub output_file_name: PathBuf,
    pub to_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
    pub path: String,
    pub extension: String,
    pub code: String,
    pub additional_code: Vec<AdditionalCode>,
}

/// Wrap one message's generated code into its file descriptors.
///
/// The primary file goes through [`Backend::format_output`]. An additional
/// file replaces the last component of the message's origin file name.
pub fn generated_code(
    message: &Message,
    backend: &dyn Backend,
    generated: GeneratedCode,
) -> Vec<FileDescriptor> {
    let GeneratedCode {
        code,
        path,
        additional_file,
        additional_code,
        ..
    } = generated;

    let to_dir = backend.output_dir().to_path_buf();
    let static_dir = backend.static_dir().map(Path::to_path_buf);

    let primary = FileDescriptor {
        output_file_name: message.file_name.clone(),
        to_dir,
        static_dir,
        path,
        extension: backend.extension().to_string(),
        code: backend.format_output(code),
        additional_code,
    };

    let side = additional_file.map(|additional| FileDescriptor {
        output_file_name: message.file_name.with_file_name(&additional.name),
        extension: additional
            .extension
            .unwrap_or_else(|| primary.extension.clone()),
        code: additional.code,
        ..primary.clone()
    });

    std::iter::once(primary).chain(side).collect()
}

/// Descriptor for a file created outside of any message, e.g. `"enums/enums.go"`
pub fn file_descriptor(to_dir: impl Into<PathBuf>, file_name: &str, code: String) -> FileDescriptor {
    let (qualified, extension) = file_name.split_once('.').unwrap_or((file_name, ""));
    let (path, name) = split_by_last(qualified, '/');
    FileDescriptor {
        output_file_name: PathBuf::from(name),
        to_dir: to_dir.into(),
        static_dir: None,
        path: path.to_string(),
        extension: extension.to_string(),
        code,
        additional_code: Vec::new(),
    }
}

pub fn files_with_extension<'a, 'e>(
    extension: &'e str,
    files: &'a [FileDescriptor],
) -> impl Iterator<Item = &'a FileDescriptor> + use<'a, 'e> {
    files.iter().filter(move |f| f.extension == extension)
}

/// Files of one extension that carry additional code
pub fn additional_code_from<'a>(extension: &str, files: &'a [FileDescriptor]) -> Vec<&'a FileDescriptor> {
    files_with_extension(extension, files)
        .filter(|f| !f.additional_code.is_empty())
        .collect()
}

/// Flatten the additional code of `files`, keeping the first entry per type
pub fn unique_additional_code<'a, I>(files: I) -> Vec<&'a AdditionalCode>
where
    I: IntoIterator<Item = &'a FileDescriptor>,
{
    let mut seen = HashSet::new();
    files
        .into_iter()
        .flat_map(|f| f.additional_code.iter())
        .filter(|c| seen.insert(c.type_name.as_str()))
        .collect()
}

/// Output directory of the first file
pub fn extract_dir<'a, I>(files: I) -> Option<&'a Path>
where
    I: IntoIterator<Item = &'a FileDescriptor>,
{
    files.into_iter().next().map(|f| f.to_dir.as_path())
}
