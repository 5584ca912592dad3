//! Value trees and override expressions
//!
//! A `ValueTree` is the canonical configuration handed to chart rendering.
//! Keys are kept sorted so the same inputs always serialize to the same bytes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Errors raised while converting value trees to and from YAML
#[derive(Debug, thiserror::Error)]
pub enum ValueTreeError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("values document must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// Nested mapping of string keys to scalars, mappings and sequences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueTree(Map<String, Value>);

impl ValueTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Parse a YAML values document. Empty documents yield an empty tree.
    pub fn from_yaml(source: &str) -> Result<Self, ValueTreeError> {
        if source.trim().is_empty() {
            return Ok(Self::new());
        }

        match serde_yaml::from_str::<Value>(source)? {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(Self(map)),
            other => Err(ValueTreeError::NotAMapping(kind_of(&other))),
        }
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, ValueTreeError> {
        Ok(serde_yaml::to_string(&self.0)?)
    }

    /// Look up a plain dotted path (no index syntax)
    pub fn get(&self, dotted: &str) -> Option<&Value> {
        let mut segments = dotted.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ValueTree {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// A single `path=value` override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideExpression {
    /// Dotted/indexed path into a value tree
    pub path: String,
    /// Raw value, typed when folded into a tree
    pub value: String,
}

impl OverrideExpression {
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Split on the first `=`. Returns `None` when there is no separator.
    pub fn parse(expression: &str) -> Option<Self> {
        let (path, value) = expression.split_once('=')?;
        Some(Self::new(path, value))
    }
}

impl fmt::Display for OverrideExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.path, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_empty_tree() {
        assert!(ValueTree::from_yaml("").unwrap().is_empty());
        assert!(ValueTree::from_yaml("# only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_scalar_document_rejected() {
        let err = ValueTree::from_yaml("just-a-string").unwrap_err();
        assert!(matches!(err, ValueTreeError::NotAMapping("a string")));
    }

    #[test]
    fn test_nested_lookup() {
        let tree = ValueTree::from_yaml("cloudCore:\n  image:\n    tag: v1.10.0\n").unwrap();
        assert_eq!(
            tree.get("cloudCore.image.tag"),
            Some(&Value::String("v1.10.0".into()))
        );
        assert!(tree.get("cloudCore.image.missing").is_none());
    }

    #[test]
    fn test_override_splits_on_first_separator() {
        let expr = OverrideExpression::parse("a.b=x=y").unwrap();
        assert_eq!(expr.path, "a.b");
        assert_eq!(expr.value, "x=y");
        assert!(OverrideExpression::parse("no-separator").is_none());
        assert_eq!(expr.to_string(), "a.b=x=y");
    }

    #[test]
    fn test_yaml_output_is_key_sorted() {
        let tree = ValueTree::from_yaml("zeta: 1\nalpha: 2\n").unwrap();
        assert_eq!(tree.to_yaml().unwrap(), "alpha: 2\nzeta: 1\n");
    }
}
