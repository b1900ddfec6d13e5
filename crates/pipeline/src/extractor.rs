//! Entity extractor - raw components and relationships from filtered text,
//! optionally merged with an external suggestion

use crate::patterns::{
    PatternSet, DEFAULT_COMPONENTS, DEFAULT_RELATIONSHIPS, LEADING_FUNCTION_WORDS, ROLE_KEYWORDS,
};
use crate::text::title_case;
use crate::Result;
use archgraph_core::{ComponentRole, RawRelationship, Suggestion};
use indexmap::IndexSet;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Names and relationship endpoints must be longer than this
const MIN_NAME_CHARS: usize = 2;

/// Components and relationships before canonicalization.
///
/// Components keep insertion order so downstream canonicalization is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub components: IndexSet<String>,
    pub relationships: Vec<RawRelationship>,
}

impl Extraction {
    /// The fixed baseline graph: a linear request path through six components
    pub fn baseline() -> Self {
        Self {
            components: DEFAULT_COMPONENTS.iter().map(|s| s.to_string()).collect(),
            relationships: DEFAULT_RELATIONSHIPS
                .iter()
                .map(|(from, to, rel_type)| RawRelationship::new(*from, *to, *rel_type))
                .collect(),
        }
    }
}

/// Pattern-based extractor. Holds its compiled pattern tables; never
/// mutates them.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    patterns: PatternSet,
}

impl EntityExtractor {
    /// Create an extractor over the built-in pattern tables
    pub fn new() -> Result<Self> {
        Ok(Self::with_patterns(PatternSet::compile()?))
    }

    pub fn with_patterns(patterns: PatternSet) -> Self {
        Self { patterns }
    }

    /// Extract components and relationships from `text`.
    ///
    /// With a suggestion, components are the suggested names followed by
    /// the complete rule-based result (baseline included), and the
    /// suggested relationships win when there are any. `None` means no
    /// suggestion was available.
    #[instrument(skip_all, fields(chars = text.len(), suggested = suggestion.is_some()))]
    pub fn extract(&self, text: &str, suggestion: Option<&Suggestion>) -> Extraction {
        let rules = self.extract_rules(text);
        let Some(suggestion) = suggestion else {
            return rules;
        };

        let mut components: IndexSet<String> = suggestion
            .components
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        components.extend(rules.components);

        let relationships = if suggestion.relationships.is_empty() {
            rules.relationships
        } else {
            suggestion.relationships.clone()
        };

        debug!(
            "Merged suggestion into {} components and {} relationships",
            components.len(),
            relationships.len()
        );
        Extraction {
            components,
            relationships,
        }
    }

    /// Pattern-only extraction: synthesized relationships when none are
    /// stated, and the baseline graph when no component is found
    pub fn extract_rules(&self, text: &str) -> Extraction {
        let mut components = IndexSet::new();
        components.extend(self.match_components(text));
        components.extend(self.match_role_keywords(text));

        if components.is_empty() {
            info!("No components found, using the baseline graph");
            return Extraction::baseline();
        }

        let mut relationships = self.match_relationships(text);
        if relationships.is_empty() && components.len() > 1 {
            let names: Vec<String> = components.iter().cloned().collect();
            relationships = synthesize_relationships(&names);
            debug!(
                "No explicit relationships; synthesized {} from component roles",
                relationships.len()
            );
        }

        debug!(
            "Extracted {} components and {} relationships",
            components.len(),
            relationships.len()
        );
        Extraction {
            components,
            relationships,
        }
    }

    /// Component names matched by the ordered component patterns
    pub fn match_components(&self, text: &str) -> Vec<String> {
        let mut found = Vec::new();
        for pattern in self.patterns.components() {
            for caps in pattern.captures_iter(text) {
                let joined = caps
                    .iter()
                    .skip(1)
                    .flatten()
                    .map(|m| m.as_str().trim())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                let name = strip_leading_function_word(&joined);
                if name.chars().count() > MIN_NAME_CHARS {
                    found.push(name.to_string());
                }
            }
        }
        found
    }

    /// Role names implied by keywords anywhere in the text
    pub fn match_role_keywords(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        ROLE_KEYWORDS
            .iter()
            .filter(|(keyword, _)| lower.contains(keyword))
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Relationships matched by the ordered relationship patterns, with
    /// title-cased endpoints
    pub fn match_relationships(&self, text: &str) -> Vec<RawRelationship> {
        let mut found = Vec::new();
        for (pattern, rel_type) in self.patterns.relationships() {
            for caps in pattern.captures_iter(text) {
                let (Some(from), Some(to)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                let from = title_case(strip_leading_function_word(from.as_str().trim()));
                let to = title_case(strip_leading_function_word(to.as_str().trim()));
                if from.chars().count() > MIN_NAME_CHARS && to.chars().count() > MIN_NAME_CHARS {
                    found.push(RawRelationship::new(from, to, *rel_type));
                }
            }
        }
        found
    }
}

/// Drop a leading article or preposition from a multi-word name
fn strip_leading_function_word(name: &str) -> &str {
    if let Some((first, rest)) = name.split_once(char::is_whitespace) {
        let rest = rest.trim_start();
        if !rest.is_empty()
            && LEADING_FUNCTION_WORDS
                .iter()
                .any(|w| first.eq_ignore_ascii_case(w))
        {
            return rest;
        }
    }
    name
}

/// Default relationships between role buckets, following the usual request
/// flow: client -> gateway/cdn -> balancer -> services -> data stores.
///
/// Only adjacent buckets are connected; a client is never linked straight
/// to a database. Self-links are skipped for names that fall in two
/// buckets.
pub fn synthesize_relationships(components: &[String]) -> Vec<RawRelationship> {
    let bucket = |role: ComponentRole| -> Vec<&String> {
        components.iter().filter(|c| role.matches(c)).collect()
    };
    let clients = bucket(ComponentRole::Client);
    let gateways = bucket(ComponentRole::Gateway);
    let balancers = bucket(ComponentRole::Balancer);
    let services = bucket(ComponentRole::Service);
    let databases = bucket(ComponentRole::Database);
    let caches = bucket(ComponentRole::Cache);
    let queues = bucket(ComponentRole::Queue);
    let cdns = bucket(ComponentRole::Cdn);

    let mut relationships = Vec::new();
    let mut link = |from: &String, to: &String, rel_type: &str| {
        if from != to {
            relationships.push(RawRelationship::new(from.as_str(), to.as_str(), rel_type));
        }
    };

    for &client in &clients {
        for &gateway in &gateways {
            link(client, gateway, "request");
        }
    }
    for &client in &clients {
        for &cdn in &cdns {
            link(client, cdn, "request");
        }
    }
    for &gateway in &gateways {
        if let Some(&balancer) = balancers.first() {
            link(gateway, balancer, "forward");
        } else if let Some(&service) = services.first() {
            link(gateway, service, "route");
        }
    }
    for &balancer in &balancers {
        for &service in &services {
            link(balancer, service, "route");
        }
    }
    for &service in &services {
        for &database in &databases {
            link(service, database, "query");
        }
        for &cache in &caches {
            link(service, cache, "check");
        }
        for &queue in &queues {
            link(service, queue, "publish");
        }
    }

    relationships
}
