//! Relationship types - typed, directed links between components

use serde::{Deserialize, Serialize};

/// Relationship type used when a suggestion omits one
pub const DEFAULT_RELATIONSHIP_TYPE: &str = "connects";

fn default_relationship_type() -> String {
    DEFAULT_RELATIONSHIP_TYPE.to_string()
}

/// A relationship as extracted, before its endpoints are canonicalized.
///
/// Endpoints are optional because an external suggestion may omit them;
/// such relationships are dropped during canonicalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawRelationship {
    #[serde(default, alias = "source")]
    pub from: Option<String>,

    #[serde(default, alias = "target")]
    pub to: Option<String>,

    #[serde(
        rename = "type",
        alias = "relationship_type",
        default = "default_relationship_type"
    )]
    pub rel_type: String,
}

impl RawRelationship {
    /// Create a raw relationship with both endpoints present
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        rel_type: impl Into<String>,
    ) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            rel_type: rel_type.into(),
        }
    }

    /// Both endpoints, if present and non-blank
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        let from = self.from.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let to = self.to.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((from, to))
    }
}

/// A canonical relationship. `from` and `to` name canonical components exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub rel_type: String,
}

impl Relationship {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        rel_type: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            rel_type: rel_type.into(),
        }
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -[{}]-> {}", self.from, self.rel_type, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_relationship_defaults_type() {
        let rel: RawRelationship =
            serde_json::from_str(r#"{"from": "Client", "to": "API"}"#).unwrap();
        assert_eq!(rel.rel_type, "connects");
        assert_eq!(rel.endpoints(), Some(("Client", "API")));
    }

    #[test]
    fn test_raw_relationship_aliases() {
        let rel: RawRelationship = serde_json::from_str(
            r#"{"source": "Worker", "target": "Queue", "relationship_type": "consume"}"#,
        )
        .unwrap();
        assert_eq!(rel, RawRelationship::new("Worker", "Queue", "consume"));
    }

    #[test]
    fn test_raw_relationship_missing_endpoint() {
        let rel: RawRelationship = serde_json::from_str(r#"{"from": "Client"}"#).unwrap();
        assert!(rel.endpoints().is_none());

        let blank = RawRelationship::new("  ", "Database", "query");
        assert!(blank.endpoints().is_none());
    }

    #[test]
    fn test_relationship_serializes_type_key() {
        let rel = Relationship::new("API", "Database", "request");
        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(json["type"], "request");
        assert_eq!(rel.to_string(), "API -[request]-> Database");
    }
}
