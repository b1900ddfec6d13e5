//! External suggestions - components and relationships proposed by a
//! language model, in the JSON shape the extraction prompt asks for

use crate::relationship::DEFAULT_RELATIONSHIP_TYPE;
use crate::{CoreError, RawRelationship, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A suggested architecture, prior to canonicalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub components: Vec<String>,
    #[serde(default)]
    pub relationships: Vec<RawRelationship>,
}

impl Suggestion {
    pub fn new(components: Vec<String>, relationships: Vec<RawRelationship>) -> Self {
        Self {
            components,
            relationships,
        }
    }

    /// Parse a suggestion leniently.
    ///
    /// Components may be plain strings or objects carrying a `name`;
    /// relationship endpoints may be spelled `from`/`source` and
    /// `to`/`target`. A payload without a `components` (or `entities`)
    /// array is rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| CoreError::Validation("suggestion must be a JSON object".into()))?;

        let components = object
            .get("components")
            .or_else(|| object.get("entities"))
            .and_then(Value::as_array)
            .ok_or_else(|| CoreError::Validation("suggestion has no components array".into()))?
            .iter()
            .filter_map(value_to_string)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        let relationships = object
            .get("relationships")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(parse_relationship).collect())
            .unwrap_or_default();

        Ok(Self {
            components,
            relationships,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.relationships.is_empty()
    }
}

fn parse_relationship(item: &Value) -> Option<RawRelationship> {
    let object = item.as_object()?;
    let from = ["from", "source", "entity1"]
        .iter()
        .find_map(|key| object.get(*key))
        .and_then(value_to_string);
    let to = ["to", "target", "entity2"]
        .iter()
        .find_map(|key| object.get(*key))
        .and_then(value_to_string);
    let rel_type = ["type", "relationship_type", "relation_type"]
        .iter()
        .find_map(|key| object.get(*key))
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_RELATIONSHIP_TYPE.to_string());

    Some(RawRelationship { from, to, rel_type })
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(arr) => arr.first().and_then(value_to_string),
        Value::Object(obj) => obj
            .get("name")
            .or_else(|| obj.get("entity"))
            .or_else(|| obj.get("value"))
            .and_then(value_to_string),
        _ => None,
    }
}
