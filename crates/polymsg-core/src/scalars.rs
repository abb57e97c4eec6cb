//! Per-backend scalar tables.
//!
//! A [`ScalarTable`] maps schema scalar names to a backend descriptor
//! ([`ScalarDef`]) and built-in primitive names (`String`, `Int`, `ID`, ...)
//! to backend-native type names. Tables deserialize from config so entries
//! can be added or overridden per project.

use crate::error::ScalarTableError;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A backend type name, or a list of them for targets with union types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeName {
    One(String),
    Many(Vec<String>),
}

impl TypeName {
    pub fn names(&self) -> Vec<&str> {
        match self {
            TypeName::One(name) => vec![name.as_str()],
            TypeName::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::One(name) => write!(f, "{name}"),
            TypeName::Many(names) => write!(f, "{}", names.join("|")),
        }
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        TypeName::One(name.to_string())
    }
}

/// Backend descriptor of one schema scalar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarDef {
    #[serde(rename = "type")]
    pub ty: TypeName,
    /// Regex the value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Import the backend needs to reference the type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import: Option<String>,
    /// Input type accepted and converted with `instantiate`
    #[serde(default, alias = "inputType", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instantiate: Option<String>,
}

impl ScalarDef {
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: TypeName::One(ty.into()),
            pattern: None,
            import: None,
            input_type: None,
            instantiate: None,
        }
    }

    pub fn many(types: &[&str]) -> Self {
        Self {
            ty: TypeName::Many(types.iter().map(|t| t.to_string()).collect()),
            ..Self::new("")
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.import = Some(import.into());
        self
    }

    pub fn with_input(mut self, input_type: impl Into<String>, instantiate: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self.instantiate = Some(instantiate.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarTable {
    #[serde(default)]
    pub scalars: IndexMap<String, ScalarDef>,
    #[serde(default)]
    pub converter: IndexMap<String, TypeName>,
}

impl ScalarTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scalar(mut self, name: impl Into<String>, def: ScalarDef) -> Self {
        self.scalars.insert(name.into(), def);
        self
    }

    pub fn with_conversion(mut self, primitive: impl Into<String>, native: impl Into<TypeName>) -> Self {
        self.converter.insert(primitive.into(), native.into());
        self
    }

    pub fn scalar(&self, name: &str) -> Option<&ScalarDef> {
        self.scalars.get(name)
    }

    pub fn conversion(&self, name: &str) -> Option<&TypeName> {
        self.converter.get(name)
    }

    /// Backend-native name for a primitive, or the name itself when unmapped
    pub fn convert(&self, name: &str) -> String {
        self.converter
            .get(name)
            .map(TypeName::to_string)
            .unwrap_or_else(|| name.to_string())
    }

    /// Scalars whose name starts with an uppercase letter, in table order
    pub fn named_scalars(&self) -> impl Iterator<Item = (&String, &ScalarDef)> {
        self.scalars
            .iter()
            .filter(|(name, _)| name.chars().next().is_some_and(char::is_uppercase))
    }

    /// Overlay entries from `overrides`, replacing entries with the same name
    pub fn merge(&mut self, overrides: ScalarTable) {
        self.scalars.extend(overrides.scalars);
        self.converter.extend(overrides.converter);
    }

    /// Check that every pattern compiles
    pub fn validate(&self) -> Result<(), ScalarTableError> {
        for (name, def) in &self.scalars {
            if let Some(pattern) = &def.pattern {
                Regex::new(pattern).map_err(|e| ScalarTableError::InvalidPattern {
                    scalar: name.clone(),
                    reason: e.to_string(),
                })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "scalars/scalars_tests.rs"]
mod scalars_tests;
