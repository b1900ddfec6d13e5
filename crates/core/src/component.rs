//! Component roles - the architectural buckets a component name falls into

use serde::{Deserialize, Serialize};

/// The architectural role of a component, inferred from its name
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRole {
    /// End user, browser or frontend
    Client,
    /// API gateway or public API surface
    Gateway,
    /// Load balancer
    Balancer,
    /// Application service or server
    Service,
    /// Relational or document store
    Database,
    /// In-memory cache
    Cache,
    /// Message queue or log
    Queue,
    /// Content delivery network
    Cdn,
}

impl ComponentRole {
    /// All roles, in request-flow order
    pub const ALL: [ComponentRole; 8] = [
        ComponentRole::Client,
        ComponentRole::Gateway,
        ComponentRole::Cdn,
        ComponentRole::Balancer,
        ComponentRole::Service,
        ComponentRole::Database,
        ComponentRole::Cache,
        ComponentRole::Queue,
    ];

    /// Substrings of a lower-cased name that place it in this role
    pub fn markers(self) -> &'static [&'static str] {
        match self {
            ComponentRole::Client => &["client", "user", "frontend"],
            ComponentRole::Gateway => &["gateway", "api"],
            ComponentRole::Balancer => &["balanc"],
            ComponentRole::Service => &["service", "server"],
            ComponentRole::Database => &[
                "database", "db", "mongo", "sql", "postgres", "mysql", "cassandra",
            ],
            ComponentRole::Cache => &["cache", "redis"],
            ComponentRole::Queue => &["queue", "kafka", "rabbit", "sqs"],
            ComponentRole::Cdn => &["cdn"],
        }
    }

    /// Whether `name` belongs to this role (case-insensitive substring match)
    pub fn matches(self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.markers().iter().any(|marker| lower.contains(marker))
    }

    /// Every role the name belongs to. A name may sit in several buckets
    /// ("Database Server" is both a service and a database).
    pub fn classify(name: &str) -> Vec<ComponentRole> {
        Self::ALL
            .into_iter()
            .filter(|role| role.matches(name))
            .collect()
    }
}

impl std::fmt::Display for ComponentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentRole::Client => write!(f, "client"),
            ComponentRole::Gateway => write!(f, "gateway"),
            ComponentRole::Balancer => write!(f, "balancer"),
            ComponentRole::Service => write!(f, "service"),
            ComponentRole::Database => write!(f, "database"),
            ComponentRole::Cache => write!(f, "cache"),
            ComponentRole::Queue => write!(f, "queue"),
            ComponentRole::Cdn => write!(f, "cdn"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_single_role() {
        assert_eq!(ComponentRole::classify("Load Balancer"), vec![ComponentRole::Balancer]);
        assert_eq!(ComponentRole::classify("Redis"), vec![ComponentRole::Cache]);
        assert_eq!(ComponentRole::classify("CDN"), vec![ComponentRole::Cdn]);
    }

    #[test]
    fn test_classify_multiple_roles() {
        let roles = ComponentRole::classify("Database Server");
        assert!(roles.contains(&ComponentRole::Service));
        assert!(roles.contains(&ComponentRole::Database));
    }

    #[test]
    fn test_classify_unknown() {
        assert!(ComponentRole::classify("Worker").is_empty());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(ComponentRole::Cdn.to_string(), "cdn");
        assert_eq!(ComponentRole::Gateway.to_string(), "gateway");
    }
}
