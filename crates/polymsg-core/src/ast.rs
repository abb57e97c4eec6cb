//! Parsed document boundary.
//!
//! Schema and message documents arrive already parsed, as graphql-js AST
//! JSON (the tree `graphql.parse` produces, serialized with
//! `JSON.stringify`). Every node carries a `kind` tag; location data and
//! any fields not modelled here are ignored. Definition and selection kinds
//! that play no part in projection deserialize to an `Other` variant.

use crate::error::DocumentResult;
use serde::Deserialize;

/// A parsed schema or message document
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

impl Document {
    /// Parse a document from AST JSON text
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum Definition {
    ObjectTypeDefinition(ObjectTypeNode),
    ObjectTypeExtension(ObjectTypeNode),
    EnumTypeDefinition(EnumTypeNode),
    ScalarTypeDefinition(ScalarTypeNode),
    UnionTypeDefinition(UnionTypeNode),
    OperationDefinition(OperationNode),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NameNode {
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectTypeNode {
    pub name: NameNode,
    #[serde(default)]
    pub fields: Vec<FieldNode>,
    #[serde(default)]
    pub directives: Vec<DirectiveNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldNode {
    pub name: NameNode,
    #[serde(rename = "type")]
    pub ty: TypeNode,
    #[serde(default)]
    pub directives: Vec<DirectiveNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumTypeNode {
    pub name: NameNode,
    #[serde(default)]
    pub values: Vec<EnumValueNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumValueNode {
    pub name: NameNode,
    #[serde(default)]
    pub directives: Vec<DirectiveNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScalarTypeNode {
    pub name: NameNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnionTypeNode {
    pub name: NameNode,
    #[serde(default)]
    pub types: Vec<NamedTypeNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedTypeNode {
    pub name: NameNode,
}

/// A field type expression: a named type wrapped by non-null and list modifiers
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeNode {
    NamedType {
        name: NameNode,
    },
    NonNullType {
        #[serde(rename = "type")]
        ty: Box<TypeNode>,
    },
    ListType {
        #[serde(rename = "type")]
        ty: Box<TypeNode>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectiveNode {
    pub name: NameNode,
    #[serde(default)]
    pub arguments: Vec<ArgumentNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArgumentNode {
    pub name: NameNode,
    pub value: ValueNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum ValueNode {
    StringValue {
        value: String,
    },
    /// Integer literal, kept as source text
    IntValue {
        value: String,
    },
    FloatValue {
        value: String,
    },
    BooleanValue {
        value: bool,
    },
    EnumValue {
        value: String,
    },
    NullValue {},
    ListValue {
        #[serde(default)]
        values: Vec<ValueNode>,
    },
    ObjectValue {
        #[serde(default)]
        fields: Vec<ObjectFieldNode>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectFieldNode {
    pub name: NameNode,
    pub value: ValueNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationNode {
    pub operation: String,
    #[serde(default)]
    pub name: Option<NameNode>,
    #[serde(default)]
    pub selection_set: Option<SelectionSetNode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionSetNode {
    #[serde(default)]
    pub selections: Vec<SelectionNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum SelectionNode {
    Field(FieldSelectionNode),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSelectionNode {
    pub name: NameNode,
    #[serde(default)]
    pub directives: Vec<DirectiveNode>,
    #[serde(default)]
    pub selection_set: Option<SelectionSetNode>,
}
