//! Mapping documents.
//!
//! A mapping document is a JSON tree that mirrors the shape of the applicant data and
//! names the PDF form field each value lands in. It is parsed once, when it is loaded,
//! into a [`MappingNode`] so the walker never has to re-inspect raw JSON shapes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

/// Declared kind of a target field in a mapping descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Checkbox,
    Radio,
}

impl FieldType {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "text" => Some(Self::Text),
            "checkbox" => Some(Self::Checkbox),
            "radio" => Some(Self::Radio),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
        };
        f.write_str(name)
    }
}

/// A parsed mapping tree.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingNode {
    /// `null` in the mapping: nothing to fill at this position.
    Empty,
    /// Bare field name, written as text.
    Leaf(String),
    /// `{ "field": ..., "type"?: ..., "option"?: ... }`
    Descriptor {
        field: String,
        kind: FieldType,
        option: Option<String>,
    },
    /// Positional children matched against a data array.
    Sequence(Vec<MappingNode>),
    /// Keyed children matched against a data object.
    Group(BTreeMap<String, MappingNode>),
}

/// A mapping document whose shape cannot be interpreted.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid mapping node at {path}: {reason}")]
pub struct MappingError {
    pub path: String,
    pub reason: String,
}

impl MappingError {
    fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

impl MappingNode {
    /// Parse raw mapping JSON.
    pub fn from_json(value: &Value) -> Result<Self, MappingError> {
        parse_node(value, "$")
    }

    /// Parse a mapping document from bytes already known to be JSON text.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, MappingSourceError> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Self::from_json(&value)?)
    }

    /// Number of field-writing nodes (leaves and descriptors) in the tree.
    pub fn field_count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Leaf(_) | Self::Descriptor { .. } => 1,
            Self::Sequence(children) => children.iter().map(Self::field_count).sum(),
            Self::Group(children) => children.values().map(Self::field_count).sum(),
        }
    }
}

/// Failure to turn mapping bytes into a [`MappingNode`].
#[derive(Debug, Error)]
pub enum MappingSourceError {
    #[error("mapping is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Shape(#[from] MappingError),
}

fn parse_node(value: &Value, path: &str) -> Result<MappingNode, MappingError> {
    match value {
        Value::Null => Ok(MappingNode::Empty),
        Value::String(name) => Ok(MappingNode::Leaf(name.clone())),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_node(item, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(MappingNode::Sequence),
        Value::Object(map) if map.contains_key("field") => parse_descriptor(map, path),
        Value::Object(map) => map
            .iter()
            .map(|(key, child)| Ok((key.clone(), parse_node(child, &format!("{path}.{key}"))?)))
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(MappingNode::Group),
        Value::Bool(_) | Value::Number(_) => Err(MappingError::new(
            path,
            "expected a field name, descriptor, array or object",
        )),
    }
}

fn parse_descriptor(
    map: &serde_json::Map<String, Value>,
    path: &str,
) -> Result<MappingNode, MappingError> {
    let field = match map.get("field") {
        Some(Value::String(name)) => name.clone(),
        _ => return Err(MappingError::new(path, "`field` must be a string")),
    };

    let kind = match map.get("type") {
        None | Some(Value::Null) => FieldType::Text,
        Some(Value::String(raw)) => FieldType::parse(raw).ok_or_else(|| {
            MappingError::new(path, format!("unknown field type '{raw}'"))
        })?,
        Some(_) => return Err(MappingError::new(path, "`type` must be a string")),
    };

    let option = match map.get("option") {
        None | Some(Value::Null) => None,
        Some(Value::String(option)) => Some(option.clone()),
        Some(Value::Number(option)) => Some(option.to_string()),
        Some(_) => {
            return Err(MappingError::new(
                path,
                "`option` must be a string or number",
            ))
        }
    };

    Ok(MappingNode::Descriptor {
        field,
        kind,
        option,
    })
}
