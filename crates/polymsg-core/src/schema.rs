//! Normalized schema definitions and parsed messages.
//!
//! [`Schema`] holds every type definition of a schema document except the
//! `Query`/`Mutation` operation types; the fields of `Query` become the
//! schema's message entry points. [`Message`] is one client-authored
//! selection tree plus the metadata read from its directives.

use crate::ast::{
    ArgumentNode, Definition, DirectiveNode, Document, FieldSelectionNode, ObjectTypeNode,
    SelectionNode, TypeNode, ValueNode,
};
use crate::error::{DocumentError, DocumentResult, ProjectionError, ProjectionResult};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

const QUERY_TYPE: &str = "Query";
const MUTATION_TYPE: &str = "Mutation";

// ============================================================================
// Directives
// ============================================================================

/// A directive argument value
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Enum(String),
    Null,
    List(Vec<DirectiveValue>),
    Object(Arguments),
}

impl DirectiveValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DirectiveValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DirectiveValue::Int(i) => Some(*i),
            DirectiveValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DirectiveValue::String(s) | DirectiveValue::Enum(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&ValueNode> for DirectiveValue {
    fn from(node: &ValueNode) -> Self {
        match node {
            ValueNode::StringValue { value } => DirectiveValue::String(value.clone()),
            ValueNode::IntValue { value } => value
                .parse()
                .map(DirectiveValue::Int)
                .unwrap_or_else(|_| DirectiveValue::String(value.clone())),
            ValueNode::FloatValue { value } => value
                .parse()
                .map(DirectiveValue::Float)
                .unwrap_or_else(|_| DirectiveValue::String(value.clone())),
            ValueNode::BooleanValue { value } => DirectiveValue::Bool(*value),
            ValueNode::EnumValue { value } => DirectiveValue::Enum(value.clone()),
            ValueNode::NullValue {} => DirectiveValue::Null,
            ValueNode::ListValue { values } => {
                DirectiveValue::List(values.iter().map(DirectiveValue::from).collect())
            }
            ValueNode::ObjectValue { fields } => DirectiveValue::Object(
                fields
                    .iter()
                    .map(|f| (f.name.value.clone(), DirectiveValue::from(&f.value)))
                    .collect(),
            ),
        }
    }
}

/// Directive arguments, keyed by argument name in declaration order
pub type Arguments = IndexMap<String, DirectiveValue>;

/// Directives attached to a node, keyed by directive name in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directives(IndexMap<String, Arguments>);

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, directive: impl Into<String>, arguments: Arguments) -> Self {
        self.0.insert(directive.into(), arguments);
        self
    }

    pub fn get(&self, directive: &str) -> Option<&Arguments> {
        self.0.get(directive)
    }

    pub fn argument(&self, directive: &str, argument: &str) -> Option<&DirectiveValue> {
        self.0.get(directive).and_then(|args| args.get(argument))
    }

    /// Arguments of the first declared directive
    pub fn first(&self) -> Option<&Arguments> {
        self.0.get_index(0).map(|(_, args)| args)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Arguments)> {
        self.0.iter()
    }
}

impl From<&[DirectiveNode]> for Directives {
    fn from(nodes: &[DirectiveNode]) -> Self {
        Directives(
            nodes
                .iter()
                .map(|d| (d.name.value.clone(), arguments_from(&d.arguments)))
                .collect(),
        )
    }
}

fn arguments_from(nodes: &[ArgumentNode]) -> Arguments {
    nodes
        .iter()
        .map(|a| (a.name.value.clone(), DirectiveValue::from(&a.value)))
        .collect()
}

// ============================================================================
// Type definitions
// ============================================================================

/// A field type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    NonNull(Box<TypeRef>),
    List(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// The named type under every wrapper
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::NonNull(inner) | TypeRef::List(inner) => inner.name(),
        }
    }
}

impl From<&TypeNode> for TypeRef {
    fn from(node: &TypeNode) -> Self {
        match node {
            TypeNode::NamedType { name } => TypeRef::Named(name.value.clone()),
            TypeNode::NonNullType { ty } => TypeRef::non_null(ty.as_ref().into()),
            TypeNode::ListType { ty } => TypeRef::list(ty.as_ref().into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: TypeRef,
    pub directives: Directives,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            directives: Directives::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub directives: Directives,
}

impl EnumValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directives: Directives::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub name: String,
    pub fields: Vec<FieldDefinition>,
    pub directives: Directives,
}

impl ObjectType {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            name: name.into(),
            fields,
            directives: Directives::new(),
        }
    }
}

impl From<&ObjectTypeNode> for ObjectType {
    fn from(node: &ObjectTypeNode) -> Self {
        ObjectType {
            name: node.name.value.clone(),
            fields: node
                .fields
                .iter()
                .map(|f| FieldDefinition {
                    name: f.name.value.clone(),
                    ty: TypeRef::from(&f.ty),
                    directives: Directives::from(f.directives.as_slice()),
                })
                .collect(),
            directives: Directives::from(node.directives.as_slice()),
        }
    }
}

/// A schema type definition
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    Scalar { name: String },
    Enum { name: String, values: Vec<EnumValue> },
    Object(ObjectType),
    Union { name: String, members: Vec<String> },
    ObjectExtension(ObjectType),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Scalar { name }
            | TypeDefinition::Enum { name, .. }
            | TypeDefinition::Union { name, .. } => name,
            TypeDefinition::Object(object) | TypeDefinition::ObjectExtension(object) => {
                &object.name
            }
        }
    }

    pub fn is_extension(&self) -> bool {
        matches!(self, TypeDefinition::ObjectExtension(_))
    }
}

// ============================================================================
// Schema
// ============================================================================

/// A message entry point: a field of the schema's `Query` type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub definitions: Vec<TypeDefinition>,
    pub entry_points: Vec<EntryPoint>,
}

impl Schema {
    pub fn new(definitions: Vec<TypeDefinition>, entry_points: Vec<EntryPoint>) -> Self {
        Self {
            definitions,
            entry_points,
        }
    }

    /// Build a schema from a parsed document
    pub fn from_document(document: &Document) -> Self {
        let mut schema = Schema::default();

        for definition in &document.definitions {
            match definition {
                Definition::ObjectTypeDefinition(node) | Definition::ObjectTypeExtension(node)
                    if node.name.value == QUERY_TYPE =>
                {
                    schema
                        .entry_points
                        .extend(node.fields.iter().map(|f| EntryPoint {
                            name: f.name.value.clone(),
                            type_name: TypeRef::from(&f.ty).name().to_string(),
                        }));
                }
                Definition::ObjectTypeDefinition(node) | Definition::ObjectTypeExtension(node)
                    if node.name.value == MUTATION_TYPE => {}
                Definition::ObjectTypeDefinition(node) => {
                    schema
                        .definitions
                        .push(TypeDefinition::Object(ObjectType::from(node)));
                }
                Definition::ObjectTypeExtension(node) => {
                    schema
                        .definitions
                        .push(TypeDefinition::ObjectExtension(ObjectType::from(node)));
                }
                Definition::EnumTypeDefinition(node) => {
                    schema.definitions.push(TypeDefinition::Enum {
                        name: node.name.value.clone(),
                        values: node
                            .values
                            .iter()
                            .map(|v| EnumValue {
                                name: v.name.value.clone(),
                                directives: Directives::from(v.directives.as_slice()),
                            })
                            .collect(),
                    });
                }
                Definition::ScalarTypeDefinition(node) => {
                    schema.definitions.push(TypeDefinition::Scalar {
                        name: node.name.value.clone(),
                    });
                }
                Definition::UnionTypeDefinition(node) => {
                    schema.definitions.push(TypeDefinition::Union {
                        name: node.name.value.clone(),
                        members: node.types.iter().map(|t| t.name.value.clone()).collect(),
                    });
                }
                Definition::OperationDefinition(_) | Definition::Other => {}
            }
        }

        schema
    }

    /// Parse a schema from AST JSON text
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        Ok(Self::from_document(&Document::from_json(json)?))
    }

    /// The entry point declared for a message name (the last declaration wins)
    pub fn entry_point(&self, message: &str) -> Option<&EntryPoint> {
        self.entry_points.iter().rev().find(|e| e.name == message)
    }

    /// Name of the root type projected for a message
    pub fn root_type(&self, message: &str) -> ProjectionResult<&str> {
        self.entry_point(message)
            .map(|e| e.type_name.as_str())
            .ok_or_else(|| ProjectionError::MessageNotDefined(message.to_string()))
    }

    pub fn message_names(&self) -> impl Iterator<Item = &str> {
        self.entry_points.iter().map(|e| e.name.as_str())
    }
}

// ============================================================================
// Messages
// ============================================================================

/// One node of a message's selection tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub name: String,
    pub directives: Directives,
    pub selections: Vec<Selection>,
}

impl Selection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_selections(mut self, selections: Vec<Selection>) -> Self {
        self.selections = selections;
        self
    }

    pub fn with_directive(mut self, directive: impl Into<String>, arguments: Arguments) -> Self {
        self.directives = self.directives.with(directive, arguments);
        self
    }

    /// Arguments of the selection's first directive, e.g. `@field(required: true, order: 2)`
    pub fn annotations(&self) -> Arguments {
        self.directives.first().cloned().unwrap_or_default()
    }

    /// `required` annotation, overriding the schema's requiredness when present
    pub fn required_override(&self) -> Option<bool> {
        self.directives
            .first()
            .and_then(|args| args.get("required"))
            .and_then(DirectiveValue::as_bool)
    }

    pub fn child(&self, name: &str) -> Option<&Selection> {
        self.selections.iter().find(|s| s.name == name)
    }
}

impl From<&FieldSelectionNode> for Selection {
    fn from(node: &FieldSelectionNode) -> Self {
        Selection {
            name: node.name.value.clone(),
            directives: Directives::from(node.directives.as_slice()),
            selections: node
                .selection_set
                .as_ref()
                .map(|set| selections_from(&set.selections))
                .unwrap_or_default(),
        }
    }
}

fn selections_from(nodes: &[SelectionNode]) -> Vec<Selection> {
    nodes
        .iter()
        .filter_map(|node| match node {
            SelectionNode::Field(field) => Some(Selection::from(field)),
            SelectionNode::Other => None,
        })
        .collect()
}

/// A message definition: one generated root type per backend
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub namespace: String,
    pub version: u32,
    pub file_name: PathBuf,
    pub selections: Vec<Selection>,
}

impl Message {
    pub fn new(name: impl Into<String>, selections: Vec<Selection>) -> Self {
        Self {
            name: name.into(),
            title: None,
            description: None,
            namespace: String::new(),
            version: 1,
            file_name: PathBuf::new(),
            selections,
        }
    }

    /// Build a message from the first selection of a document's query operation
    ///
    /// `title`, `description`, `namespace` and `version` are read from the
    /// `value` argument of the same-named directive on that selection.
    pub fn from_document(document: &Document, file_name: impl AsRef<Path>) -> DocumentResult<Self> {
        let operation = document
            .definitions
            .iter()
            .find_map(|d| match d {
                Definition::OperationDefinition(op) if op.operation == "query" => Some(op),
                _ => None,
            })
            .ok_or(DocumentError::NoQueryOperation)?;

        let root = operation
            .selection_set
            .as_ref()
            .and_then(|set| {
                set.selections.iter().find_map(|s| match s {
                    SelectionNode::Field(field) => Some(field),
                    SelectionNode::Other => None,
                })
            })
            .ok_or(DocumentError::EmptyQuery)?;

        let selection = Selection::from(root);
        let metadata = |directive: &str| {
            selection
                .directives
                .argument(directive, "value")
                .and_then(DirectiveValue::as_str)
                .map(str::to_string)
        };

        let version = match selection.directives.argument("version", "value") {
            Some(value) => {
                let version = value.as_i64().unwrap_or(0);
                u32::try_from(version)
                    .ok()
                    .filter(|v| *v >= 1)
                    .ok_or_else(|| DocumentError::InvalidVersion {
                        message: selection.name.clone(),
                        version,
                    })?
            }
            None => 1,
        };

        Ok(Message {
            title: metadata("title"),
            description: metadata("description"),
            namespace: metadata("namespace").unwrap_or_default(),
            version,
            file_name: file_name.as_ref().to_path_buf(),
            name: selection.name,
            selections: selection.selections,
        })
    }

    /// Parse a message from AST JSON text
    pub fn from_json(json: &str, file_name: impl AsRef<Path>) -> DocumentResult<Self> {
        Self::from_document(&Document::from_json(json)?, file_name)
    }

    pub fn selection(&self, name: &str) -> Option<&Selection> {
        self.selections.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
#[path = "schema/schema_tests.rs"]
mod schema_tests;
