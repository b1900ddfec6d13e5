//! Pattern and keyword tables used by the filter and the extractor.
//!
//! The tables are plain constant data. [`PatternSet::compile`] turns the
//! regular expressions into a value that extractors hold and borrow.

use crate::Result;
use regex::{Regex, RegexBuilder};

/// Architecture vocabulary, matched as lower-case substrings
pub const ARCHITECTURE_KEYWORDS: &[&str] = &[
    "api", "gateway", "service", "server", "database", "cache", "queue",
    "load balancer", "cdn", "microservice", "request", "response",
    "authentication", "authorization", "storage", "notification",
    "message", "broker", "cluster", "node", "endpoint", "architecture",
    "component", "module", "layer", "tier", "client", "backend", "frontend",
    "scaling", "partition", "replica", "shard", "distributed", "system",
    "protocol", "http", "websocket", "rest", "grpc", "kafka", "redis",
    "mongodb", "postgresql", "mysql", "nosql", "sql", "data flow",
    "pipeline", "stream", "batch", "real-time", "latency", "throughput",
];

/// Boilerplate removed from scraped text before segmentation
pub const NOISE_PHRASES: &[&str] = &[
    "advertisement", "subscribe", "newsletter", "comment below",
    "like and share", "follow us", "social media", "copyright",
    "all rights reserved", "terms of service", "privacy policy",
];

/// Component patterns, in application order. Every capture group that
/// participates in a match contributes to the component name.
pub const COMPONENT_PATTERNS: &[&str] = &[
    // explicit components
    r"\b(API Gateway|API|Load Balancer|CDN|Message Queue|Cache|Web Server|App Server)\b",
    r"\b(\w+)\s+(Service|Server|Database|DB|Cache|Queue|Broker)\b",
    // technologies
    r"\b(Redis|MongoDB|MySQL|PostgreSQL|Kafka|RabbitMQ|Elasticsearch|Cassandra)\b",
    r"\b(Nginx|Apache|HAProxy|Envoy)\b",
    // cloud services
    r"\b(AWS\s+\w+|S3|EC2|Lambda|DynamoDB|SQS|SNS)\b",
    r"\b(Google\s+\w+|Cloud Storage|BigQuery|Pub/Sub)\b",
    // architectural roles
    r"\b(Frontend|Backend|Client|Server|Worker|Consumer|Producer)\b",
];

/// Keyword found anywhere in the lower-cased text -> component it implies
pub const ROLE_KEYWORDS: &[(&str, &str)] = &[
    ("client", "Client"),
    ("user", "Client"),
    ("frontend", "Frontend"),
    ("api", "API Gateway"),
    ("gateway", "API Gateway"),
    ("load balanc", "Load Balancer"),
    ("database", "Database"),
    ("cache", "Cache"),
    ("queue", "Message Queue"),
    ("cdn", "CDN"),
    ("storage", "Storage"),
    ("authentication", "Auth Service"),
    ("notification", "Notification Service"),
    ("search", "Search Service"),
    ("analytics", "Analytics Service"),
];

const ENDPOINT: &str = r"(\w+(?:\s+\w+)?)";

/// Relationship patterns with the relationship type they produce.
/// `{e}` stands for an endpoint of one or two words.
pub const RELATIONSHIP_PATTERNS: &[(&str, &str)] = &[
    (r"\b{e}\s+(?:sends?|forwards?|routes?)\s+(?:requests?\s+to|requests?|to)\s+{e}", "request"),
    (r"\b{e}\s+(?:quer(?:y|ies)|reads?)\s+(?:from\s+)?{e}", "query"),
    (r"\b{e}\s+(?:writes?|stores?)\s+(?:to|in)\s+{e}", "write"),
    (r"\b{e}\s+(?:connects?|communicates?)\s+(?:with|to)\s+{e}", "connects"),
    (r"\b{e}\s*(?:→|->)\s*{e}", "request"),
];

/// Leading words dropped from a matched name ("the Database" -> "Database")
pub const LEADING_FUNCTION_WORDS: &[&str] = &[
    "the", "a", "an", "to", "from", "and", "or", "of", "in", "with", "each",
    "every", "its", "their", "our", "this", "that",
];

/// Components of the baseline graph used when nothing is extracted
pub const DEFAULT_COMPONENTS: &[&str] = &[
    "Client",
    "API Gateway",
    "Load Balancer",
    "Application Server",
    "Database",
    "Cache",
];

/// Relationships of the baseline graph: a linear request path
pub const DEFAULT_RELATIONSHIPS: &[(&str, &str, &str)] = &[
    ("Client", "API Gateway", "request"),
    ("API Gateway", "Load Balancer", "forward"),
    ("Load Balancer", "Application Server", "route"),
    ("Application Server", "Database", "query"),
    ("Application Server", "Cache", "check"),
];

/// Compiled extraction patterns
#[derive(Debug, Clone)]
pub struct PatternSet {
    components: Vec<Regex>,
    relationships: Vec<(Regex, &'static str)>,
}

impl PatternSet {
    /// Compile the built-in tables
    pub fn compile() -> Result<Self> {
        let components = COMPONENT_PATTERNS
            .iter()
            .map(|pattern| case_insensitive(pattern))
            .collect::<Result<Vec<_>>>()?;

        let relationships = RELATIONSHIP_PATTERNS
            .iter()
            .map(|(pattern, rel_type)| {
                let pattern = pattern.replace("{e}", ENDPOINT);
                Ok((case_insensitive(&pattern)?, *rel_type))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            components,
            relationships,
        })
    }

    pub fn components(&self) -> &[Regex] {
        &self.components
    }

    pub fn relationships(&self) -> &[(Regex, &'static str)] {
        &self.relationships
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_compile() {
        let patterns = PatternSet::compile().unwrap();
        assert_eq!(patterns.components().len(), COMPONENT_PATTERNS.len());
        assert_eq!(patterns.relationships().len(), RELATIONSHIP_PATTERNS.len());
    }

    #[test]
    fn test_explicit_pattern_prefers_longer_phrase() {
        let patterns = PatternSet::compile().unwrap();
        let explicit = &patterns.components()[0];
        let found: Vec<&str> = explicit
            .find_iter("the api gateway calls the API")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["api gateway", "API"]);
    }

    #[test]
    fn test_default_graph_is_consistent() {
        for (from, to, _) in DEFAULT_RELATIONSHIPS {
            assert!(DEFAULT_COMPONENTS.contains(from));
            assert!(DEFAULT_COMPONENTS.contains(to));
        }
    }
}
