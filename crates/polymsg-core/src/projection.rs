//! Projection engine.
//!
//! Projection computes, for one message and one backend, the minimal set
//! of types needed to represent the message's selection tree:
//!
//! ```text
//! message selections ──► root type fields (intersection)
//!                           │
//!                           ├─ Scalar  ──► scalar descriptor (one per reference site)
//!                           ├─ Enum    ──► enum descriptor (once per projection)
//!                           ├─ Union   ──► `Any` scalar descriptor
//!                           ├─ Object  ──► recurse into child selections,
//!                           │              then object descriptor (once per projection)
//!                           └─ builtin ──► converted primitive, no descriptor
//! ```
//!
//! Descriptors are accumulated in discovery order; a nested object follows
//! the types its fields reference. The root field list is returned last, as
//! [`Projection::root`].
//!
//! A [`GenerationContext`] lives for exactly one [`project`] call and is
//! threaded through the recursion explicitly.

use crate::error::{ProjectionError, ProjectionResult};
use crate::generator::{NameContext, TypeEmitter};
use crate::modifiers::{ResolvedField, ResolvedObject, ResolvedSchema, ResolvedType};
use crate::scalars::{ScalarDef, ScalarTable};
use crate::schema::{Arguments, DirectiveValue, Message, Selection};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Primitive type names that need no schema definition
pub const BUILTIN_PRIMITIVES: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Scalar that union types degrade to
pub const ANY_SCALAR: &str = "Any";

/// A scalar reference resolved against the backend's scalar table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarRef {
    /// Schema scalar name
    pub name: String,
    /// Name after the backend's case conversion
    pub label: String,
    pub def: ScalarDef,
}

/// Resolved type of a projected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Builtin { name: String, native: String },
    Scalar(ScalarRef),
    Enum { name: String, native: String },
    Object(String),
}

impl FieldType {
    /// Schema-level type name
    pub fn name(&self) -> &str {
        match self {
            FieldType::Builtin { name, .. } | FieldType::Enum { name, .. } => name,
            FieldType::Scalar(scalar) => &scalar.name,
            FieldType::Object(name) => name,
        }
    }

    /// Backend-native type name
    pub fn native(&self) -> String {
        match self {
            FieldType::Builtin { native, .. } | FieldType::Enum { native, .. } => native.clone(),
            FieldType::Scalar(scalar) => scalar.def.ty.to_string(),
            FieldType::Object(name) => name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldModifiers {
    pub required: bool,
    pub array: bool,
    pub is_enum: bool,
    pub is_scalar: bool,
}

/// One field of a projected object or of the root
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedField {
    pub name: String,
    pub ty: FieldType,
    pub modifiers: FieldModifiers,
    /// Arguments of the selection's first directive
    pub annotations: Arguments,
}

impl ProjectedField {
    pub fn scalar(&self) -> Option<&ScalarRef> {
        match &self.ty {
            FieldType::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn pattern(&self) -> Option<&str> {
        self.scalar().and_then(|s| s.def.pattern.as_deref())
    }

    /// `order` annotation
    pub fn order(&self) -> Option<i64> {
        self.annotations.get("order").and_then(DirectiveValue::as_i64)
    }
}

/// Names of the fields carrying each modifier, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierSets {
    pub required: Vec<String>,
    pub array: Vec<String>,
    pub enums: Vec<String>,
    pub scalars: Vec<String>,
}

impl ModifierSets {
    pub fn from_fields(fields: &[ProjectedField]) -> Self {
        let names = |keep: fn(&FieldModifiers) -> bool| -> Vec<String> {
            fields
                .iter()
                .filter(|f| keep(&f.modifiers))
                .map(|f| f.name.clone())
                .collect()
        };
        Self {
            required: names(|m| m.required),
            array: names(|m| m.array),
            enums: names(|m| m.is_enum),
            scalars: names(|m| m.is_scalar),
        }
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required.iter().any(|n| n == field)
    }

    pub fn is_array(&self, field: &str) -> bool {
        self.array.iter().any(|n| n == field)
    }

    pub fn is_enum(&self, field: &str) -> bool {
        self.enums.iter().any(|n| n == field)
    }
}

/// Object type handed to [`TypeEmitter::struct_def`]
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSpec {
    pub name: String,
    pub fields: Vec<ProjectedField>,
}

impl ObjectSpec {
    /// Annotations of each field, keyed by field name
    pub fn directives(&self) -> IndexMap<&str, &Arguments> {
        self.fields
            .iter()
            .map(|f| (f.name.as_str(), &f.annotations))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    Object,
    Enum,
    Scalar,
}

/// One referenced type of a projection
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor<F> {
    /// Type name; converted for enums, schema name for objects and scalars
    pub type_name: String,
    pub kind: DescriptorKind,
    pub scalar: Option<ScalarRef>,
    pub add_on: Option<F>,
}

impl<F> TypeDescriptor<F> {
    pub fn is_enum(&self) -> bool {
        self.kind == DescriptorKind::Enum
    }

    pub fn is_scalar(&self) -> bool {
        self.kind == DescriptorKind::Scalar
    }
}

/// The root type of a projection
#[derive(Debug, Clone, PartialEq)]
pub struct RootDescriptor {
    /// Schema type the message projects
    pub type_name: String,
    pub fields: Vec<ProjectedField>,
    pub modifiers: ModifierSets,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection<F> {
    /// Referenced types in discovery order
    pub types: Vec<TypeDescriptor<F>>,
    /// Root field list; conceptually the last element of the projection
    pub root: RootDescriptor,
}

impl<F> Projection<F> {
    /// Descriptors deduplicated by type name, first occurrence wins
    pub fn unique_types(&self) -> Vec<&TypeDescriptor<F>> {
        let mut seen = HashSet::new();
        self.types
            .iter()
            .filter(|t| seen.insert(t.type_name.as_str()))
            .collect()
    }

    pub fn enums(&self) -> impl Iterator<Item = &TypeDescriptor<F>> {
        self.types.iter().filter(|t| t.is_enum())
    }

    /// Distinct scalars referenced anywhere in the projection, first occurrence wins
    pub fn scalars(&self) -> Vec<&ScalarRef> {
        let mut seen = HashSet::new();
        self.types
            .iter()
            .filter_map(|t| t.scalar.as_ref())
            .filter(|s| seen.insert(s.name.as_str()))
            .collect()
    }
}

/// Per-projection state: generated code by type name and the descriptor accumulator
#[derive(Debug)]
pub struct GenerationContext<F> {
    objects: IndexMap<String, F>,
    enums: IndexMap<String, F>,
    expanding: HashSet<String>,
    descriptors: Vec<TypeDescriptor<F>>,
}

impl<F> GenerationContext<F> {
    fn new() -> Self {
        Self {
            objects: IndexMap::new(),
            enums: IndexMap::new(),
            expanding: HashSet::new(),
            descriptors: Vec::new(),
        }
    }

    pub fn object_code(&self, name: &str) -> Option<&F> {
        self.objects.get(name)
    }

    pub fn enum_code(&self, name: &str) -> Option<&F> {
        self.enums.get(name)
    }
}

/// Inputs of one projection
#[derive(Debug, Clone, Copy)]
pub struct ProjectionRequest<'a> {
    pub message: &'a Message,
    pub schema: &'a ResolvedSchema,
    /// Name of the schema type the message projects
    pub root: &'a str,
    pub scalars: &'a ScalarTable,
}

/// Project a message against a resolved schema.
///
/// Fails when a referenced scalar has no table entry, when a selected name
/// cannot be resolved, when the root type does not exist, or when an
/// object type is reachable from itself.
pub fn project<E>(
    request: &ProjectionRequest<'_>,
    emitter: &E,
) -> ProjectionResult<Projection<E::Fragment>>
where
    E: TypeEmitter + ?Sized,
{
    let root = request
        .schema
        .object(request.root)
        .ok_or_else(|| ProjectionError::RootTypeNotFound(request.root.to_string()))?;

    let mut ctx = GenerationContext::new();
    let mut fields = Vec::with_capacity(request.message.selections.len());

    for selection in &request.message.selections {
        let Some(schema_field) = root.field(&selection.name) else {
            warn!(
                message = %request.message.name,
                field = %selection.name,
                root = %root.name,
                "selected field is not part of the root type; skipping"
            );
            continue;
        };
        fields.push(project_field(request, emitter, &mut ctx, schema_field, selection)?);
    }

    debug!(
        message = %request.message.name,
        types = ctx.descriptors.len(),
        fields = fields.len(),
        "projected message"
    );

    Ok(Projection {
        types: ctx.descriptors,
        root: RootDescriptor {
            type_name: root.name.clone(),
            modifiers: ModifierSets::from_fields(&fields),
            fields,
        },
    })
}

fn project_field<E>(
    request: &ProjectionRequest<'_>,
    emitter: &E,
    ctx: &mut GenerationContext<E::Fragment>,
    schema_field: &ResolvedField,
    selection: &Selection,
) -> ProjectionResult<ProjectedField>
where
    E: TypeEmitter + ?Sized,
{
    let ty = type_for(
        request,
        emitter,
        ctx,
        &schema_field.name,
        &schema_field.type_name,
        selection,
    )?;

    Ok(ProjectedField {
        name: schema_field.name.clone(),
        modifiers: FieldModifiers {
            required: selection
                .required_override()
                .unwrap_or(schema_field.flags.required),
            array: schema_field.flags.array,
            is_enum: schema_field.flags.is_enum,
            is_scalar: schema_field.flags.is_scalar,
        },
        ty,
        annotations: selection.annotations(),
    })
}

fn type_for<E>(
    request: &ProjectionRequest<'_>,
    emitter: &E,
    ctx: &mut GenerationContext<E::Fragment>,
    field: &str,
    type_name: &str,
    selection: &Selection,
) -> ProjectionResult<FieldType>
where
    E: TypeEmitter + ?Sized,
{
    let Some(definition) = request.schema.find(type_name) else {
        if BUILTIN_PRIMITIVES.contains(&type_name) {
            return Ok(FieldType::Builtin {
                name: type_name.to_string(),
                native: emitter.convert_type(type_name),
            });
        }
        return Err(ProjectionError::InvalidType {
            type_name: type_name.to_string(),
            field: field.to_string(),
        });
    };

    match definition {
        ResolvedType::Scalar { name } => scalar_for(request, emitter, ctx, name),
        ResolvedType::Union { .. } => scalar_for(request, emitter, ctx, ANY_SCALAR),
        ResolvedType::Enum { name, values } => {
            let native = emitter.convert_type(name);
            if !ctx.enums.contains_key(name) {
                let code = emitter.enum_def(name, values);
                ctx.enums.insert(name.clone(), code.clone());
                ctx.descriptors.push(TypeDescriptor {
                    type_name: native.clone(),
                    kind: DescriptorKind::Enum,
                    scalar: None,
                    add_on: Some(code),
                });
            }
            Ok(FieldType::Enum {
                name: name.clone(),
                native,
            })
        }
        ResolvedType::Object(object) => {
            if !ctx.objects.contains_key(&object.name) {
                expand_object(request, emitter, ctx, object, &selection.selections)?;
            }
            Ok(FieldType::Object(object.name.clone()))
        }
    }
}

fn expand_object<E>(
    request: &ProjectionRequest<'_>,
    emitter: &E,
    ctx: &mut GenerationContext<E::Fragment>,
    object: &ResolvedObject,
    selections: &[Selection],
) -> ProjectionResult<()>
where
    E: TypeEmitter + ?Sized,
{
    if !ctx.expanding.insert(object.name.clone()) {
        return Err(ProjectionError::CircularReference(object.name.clone()));
    }

    let mut fields = Vec::with_capacity(selections.len());
    for selection in selections {
        let schema_field =
            object
                .field(&selection.name)
                .ok_or_else(|| ProjectionError::InvalidType {
                    type_name: object.name.clone(),
                    field: selection.name.clone(),
                })?;
        fields.push(project_field(request, emitter, ctx, schema_field, selection)?);
    }

    let modifiers = ModifierSets::from_fields(&fields);
    let spec = ObjectSpec {
        name: object.name.clone(),
        fields,
    };
    let code = emitter.struct_def(&spec, &modifiers)?;

    ctx.expanding.remove(&object.name);
    ctx.objects.insert(object.name.clone(), code.clone());
    ctx.descriptors.push(TypeDescriptor {
        type_name: object.name.clone(),
        kind: DescriptorKind::Object,
        scalar: None,
        add_on: Some(code),
    });
    Ok(())
}

fn scalar_for<E>(
    request: &ProjectionRequest<'_>,
    emitter: &E,
    ctx: &mut GenerationContext<E::Fragment>,
    name: &str,
) -> ProjectionResult<FieldType>
where
    E: TypeEmitter + ?Sized,
{
    let def = request
        .scalars
        .scalar(name)
        .ok_or_else(|| ProjectionError::ScalarNotDefined(name.to_string()))?;

    let scalar = ScalarRef {
        name: name.to_string(),
        label: emitter.format_name(name, NameContext::Scalar),
        def: def.clone(),
    };
    ctx.descriptors.push(TypeDescriptor {
        type_name: name.to_string(),
        kind: DescriptorKind::Scalar,
        scalar: Some(scalar.clone()),
        add_on: None,
    });
    Ok(FieldType::Scalar(scalar))
}
