//! Modifier resolution.
//!
//! Turns raw schema definitions into a [`ResolvedSchema`]: every field's
//! type expression is unwrapped into its named type plus derived flags, and
//! object extensions are merged into their base type. The input is never
//! modified, so one parsed schema serves every message and backend.

use crate::error::{ProjectionError, ProjectionResult};
use crate::schema::{Directives, EnumValue, FieldDefinition, TypeDefinition, TypeRef};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Required/array modifiers of a field type expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeModifiers {
    pub required: bool,
    pub array: bool,
}

/// Unwrap a type expression into its modifiers and named type.
///
/// With a list outermost, requiredness is looked for one level inside
/// (`[T!]`); with non-null outermost, a list is looked for one level inside
/// (`[T]!`). Deeper list nesting collapses into a single array flag.
pub fn unwrap_modifiers(ty: &TypeRef) -> (TypeModifiers, &str) {
    let mut modifiers = TypeModifiers::default();
    match ty {
        TypeRef::List(inner) => {
            modifiers.array = true;
            modifiers.required = matches!(**inner, TypeRef::NonNull(_));
        }
        TypeRef::NonNull(inner) => {
            modifiers.required = true;
            modifiers.array = matches!(**inner, TypeRef::List(_));
        }
        TypeRef::Named(_) => {}
    }
    (modifiers, ty.name())
}

/// Flags derived for a field during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldFlags {
    pub required: bool,
    pub array: bool,
    /// Exactly one enum definition carries the field's type name
    pub is_enum: bool,
    /// The field's type name is a schema scalar
    pub is_scalar: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub name: String,
    pub type_name: String,
    pub flags: FieldFlags,
    pub directives: Directives,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedObject {
    pub name: String,
    pub fields: Vec<ResolvedField>,
    pub directives: Directives,
}

impl ResolvedObject {
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A schema type after resolution; extensions no longer exist at this stage
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedType {
    Scalar { name: String },
    Enum { name: String, values: Vec<EnumValue> },
    Object(ResolvedObject),
    Union { name: String, members: Vec<String> },
}

impl ResolvedType {
    pub fn name(&self) -> &str {
        match self {
            ResolvedType::Scalar { name }
            | ResolvedType::Enum { name, .. }
            | ResolvedType::Union { name, .. } => name,
            ResolvedType::Object(object) => &object.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSchema {
    pub types: Vec<ResolvedType>,
}

impl ResolvedSchema {
    /// Look up a type by name; the last definition wins
    pub fn find(&self, name: &str) -> Option<&ResolvedType> {
        self.types.iter().rev().find(|t| t.name() == name)
    }

    pub fn object(&self, name: &str) -> Option<&ResolvedObject> {
        self.types.iter().rev().find_map(|t| match t {
            ResolvedType::Object(object) if object.name == name => Some(object),
            _ => None,
        })
    }
}

/// Resolve field modifiers and merge object extensions.
///
/// Fails with [`ProjectionError::ExtensionTargetNotFound`] when an extension
/// has no base object of the same name.
pub fn resolve_modifiers(definitions: &[TypeDefinition]) -> ProjectionResult<ResolvedSchema> {
    let enum_counts = enum_name_counts(definitions);
    let scalar_names: HashSet<&str> = definitions
        .iter()
        .filter_map(|d| match d {
            TypeDefinition::Scalar { name } => Some(name.as_str()),
            _ => None,
        })
        .collect();

    let resolve_fields = |fields: &[FieldDefinition]| -> Vec<ResolvedField> {
        fields
            .iter()
            .map(|field| {
                let (modifiers, type_name) = unwrap_modifiers(&field.ty);
                ResolvedField {
                    name: field.name.clone(),
                    type_name: type_name.to_string(),
                    flags: FieldFlags {
                        required: modifiers.required,
                        array: modifiers.array,
                        is_enum: enum_counts.get(type_name) == Some(&1),
                        is_scalar: scalar_names.contains(type_name),
                    },
                    directives: field.directives.clone(),
                }
            })
            .collect()
    };

    let mut types = Vec::with_capacity(definitions.len());
    for definition in definitions {
        let resolved = match definition {
            TypeDefinition::Scalar { name } => ResolvedType::Scalar { name: name.clone() },
            TypeDefinition::Enum { name, values } => ResolvedType::Enum {
                name: name.clone(),
                values: values.clone(),
            },
            TypeDefinition::Union { name, members } => ResolvedType::Union {
                name: name.clone(),
                members: members.clone(),
            },
            TypeDefinition::Object(object) => ResolvedType::Object(ResolvedObject {
                name: object.name.clone(),
                fields: resolve_fields(&object.fields),
                directives: object.directives.clone(),
            }),
            TypeDefinition::ObjectExtension(_) => continue,
        };
        types.push(resolved);
    }

    for definition in definitions {
        let TypeDefinition::ObjectExtension(extension) = definition else {
            continue;
        };
        let base = types
            .iter_mut()
            .rev()
            .find_map(|t| match t {
                ResolvedType::Object(object) if object.name == extension.name => Some(object),
                _ => None,
            })
            .ok_or_else(|| ProjectionError::ExtensionTargetNotFound(extension.name.clone()))?;
        base.fields.extend(resolve_fields(&extension.fields));
    }

    Ok(ResolvedSchema { types })
}

fn enum_name_counts(definitions: &[TypeDefinition]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for definition in definitions {
        if let TypeDefinition::Enum { name, .. } = definition {
            *counts.entry(name.as_str()).or_default() += 1;
        }
    }

    let mut ambiguous: Vec<&str> = counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(name, _)| *name)
        .collect();
    ambiguous.sort_unstable();
    for name in ambiguous {
        warn!(enum_name = name, "enum defined more than once; fields of this type are not treated as enums");
    }

    counts
}
