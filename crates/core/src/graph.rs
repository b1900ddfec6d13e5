//! The canonical architecture graph

use crate::{CoreError, Relationship, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Canonical components plus the relationships between them.
///
/// A `Graph` is immutable once built. Every relationship endpoint names a
/// component exactly, component names are unique case-insensitively, and
/// no (from, to, type) triple appears twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GraphParts")]
pub struct Graph {
    components: Vec<String>,
    relationships: Vec<Relationship>,
}

#[derive(Deserialize)]
struct GraphParts {
    components: Vec<String>,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

impl TryFrom<GraphParts> for Graph {
    type Error = CoreError;

    fn try_from(parts: GraphParts) -> Result<Self> {
        Graph::new(parts.components, parts.relationships)
    }
}

impl Graph {
    /// Build a graph, rejecting anything that breaks the graph invariants
    pub fn new(components: Vec<String>, relationships: Vec<Relationship>) -> Result<Self> {
        let mut builder = GraphBuilder::new();
        for name in components {
            if !builder.add_component(&name) {
                return Err(CoreError::DuplicateComponent(name));
            }
        }
        for rel in relationships {
            if !builder.add_relationship(rel.clone())? {
                return Err(CoreError::DuplicateRelationship {
                    from: rel.from,
                    to: rel.to,
                    rel_type: rel.rel_type,
                });
            }
        }
        Ok(builder.build())
    }

    /// Parse and validate a graph from its JSON contract form
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(CoreError::from)
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.iter().any(|c| c == name)
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Incrementally assembles a [`Graph`] while keeping its invariants
#[derive(Debug, Default)]
pub struct GraphBuilder {
    components: Vec<String>,
    lower: HashSet<String>,
    relationships: Vec<Relationship>,
    seen: HashSet<Relationship>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component. Returns `false` for blank names and for names that
    /// already exist case-insensitively.
    pub fn add_component(&mut self, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        if !self.lower.insert(name.to_lowercase()) {
            return false;
        }
        self.components.push(name.to_string());
        true
    }

    /// Add a relationship. Returns `Ok(false)` when the triple is already
    /// present, an error when an endpoint is not a component.
    pub fn add_relationship(&mut self, rel: Relationship) -> Result<bool> {
        for endpoint in [&rel.from, &rel.to] {
            if !self.components.iter().any(|c| c == endpoint) {
                return Err(CoreError::UnknownComponent(endpoint.clone()));
            }
        }
        if !self.seen.insert(rel.clone()) {
            return Ok(false);
        }
        self.relationships.push(rel);
        Ok(true)
    }

    pub fn build(self) -> Graph {
        Graph {
            components: self.components,
            relationships: self.relationships,
        }
    }
}
