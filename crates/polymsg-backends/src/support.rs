//! Helpers shared by the text backends

use polymsg_core::output::{AdditionalCode, FileDescriptor, additional_code_from, unique_additional_code};
use polymsg_core::projection::{DescriptorKind, FieldType, Projection, ProjectedField};
use polymsg_core::schema::Message;

/// Escape `s` for a double-quoted string literal (Go, Python, protobuf)
pub(crate) fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Fragments of the object and enum types, first occurrence per type
pub(crate) fn type_fragments<F: Clone>(projection: &Projection<F>) -> Vec<(DescriptorKind, F)> {
    projection
        .unique_types()
        .into_iter()
        .filter_map(|t| t.add_on.clone().map(|code| (t.kind, code)))
        .collect()
}

/// Enum fragments as cross-message additional code
pub(crate) fn enum_additional_code(projection: &Projection<String>) -> Vec<AdditionalCode> {
    projection
        .enums()
        .filter_map(|t| {
            t.add_on
                .as_ref()
                .map(|code| AdditionalCode::new(t.type_name.clone(), code.clone()))
        })
        .collect()
}

/// Deduplicated enum code attached to the files of one extension
pub(crate) fn aggregated_enums<'a>(
    extension: &str,
    files: &'a [FileDescriptor],
) -> (Vec<&'a FileDescriptor>, Vec<&'a AdditionalCode>) {
    let carriers = additional_code_from(extension, files);
    let enums = unique_additional_code(carriers.iter().copied());
    (carriers, enums)
}

/// Name of a base type as it appears in generated source
pub(crate) fn base_type(field: &ProjectedField) -> String {
    match &field.ty {
        FieldType::Builtin { native, .. } | FieldType::Enum { native, .. } => native.clone(),
        FieldType::Scalar(scalar) => scalar.def.ty.to_string(),
        FieldType::Object(name) => name.clone(),
    }
}

/// Comment lines for the message title and description
pub(crate) fn header_lines(message: &Message) -> Vec<String> {
    [message.title.as_deref(), message.description.as_deref()]
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect()
}
