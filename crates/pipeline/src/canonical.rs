//! Canonicalizer - collapses near-identical component names and re-maps
//! relationships onto the surviving names

use crate::similarity::is_similar;
use crate::text::title_case;
use crate::Result;
use archgraph_core::graph::GraphBuilder;
use archgraph_core::relationship::DEFAULT_RELATIONSHIP_TYPE;
use archgraph_core::{Graph, RawRelationship, Relationship};
use regex::{Captures, Regex};
use tracing::{debug, instrument};

/// Names more similar than this are the same component
pub const COMPONENT_SIMILARITY: f64 = 0.8;

/// Relationship endpoints resolve to a component above this similarity
pub const ENDPOINT_SIMILARITY: f64 = 0.75;

#[derive(Debug, Clone)]
pub struct Canonicalizer {
    abbreviations: Regex,
}

impl Canonicalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            abbreviations: Regex::new(r"\b(Api|Db|Cdn|Http|Rest)\b")?,
        })
    }

    /// Trim, title-case and restore the casing of well-known abbreviations
    pub fn normalize_name(&self, name: &str) -> String {
        let titled = title_case(name.trim());
        self.abbreviations
            .replace_all(&titled, |caps: &Captures| match &caps[1] {
                "Api" => "API",
                "Db" => "Database",
                "Cdn" => "CDN",
                "Http" => "HTTP",
                _ => "REST",
            })
            .into_owned()
    }

    /// Build the canonical graph.
    ///
    /// Components are accepted in input order; a name similar to an
    /// already accepted one is dropped. Relationships whose endpoints do
    /// not resolve are dropped, as are repeated (from, to, type) triples.
    #[instrument(skip_all)]
    pub fn canonicalize<I, S>(&self, raw_components: I, raw_relationships: &[RawRelationship]) -> Graph
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GraphBuilder::new();
        let mut accepted: Vec<(String, String)> = Vec::new();

        for raw in raw_components {
            let raw = raw.as_ref();
            if raw.trim().is_empty() {
                continue;
            }
            let name = self.normalize_name(raw);
            let lower = name.to_lowercase();
            if let Some((_, existing)) = accepted
                .iter()
                .find(|(existing_lower, _)| is_similar(&lower, existing_lower, COMPONENT_SIMILARITY))
            {
                debug!("Merged component '{}' into '{}'", raw, existing);
                continue;
            }
            if builder.add_component(&name) {
                accepted.push((lower, name));
            }
        }

        for raw in raw_relationships {
            let Some((from, to)) = raw.endpoints() else {
                debug!("Dropped relationship with a missing endpoint");
                continue;
            };
            let resolved = (
                self.resolve(&accepted, &self.normalize_name(from)),
                self.resolve(&accepted, &self.normalize_name(to)),
            );
            let (Some(from), Some(to)) = resolved else {
                debug!("Dropped relationship {} -> {}: endpoint not a component", from, to);
                continue;
            };
            let rel_type = match raw.rel_type.trim() {
                "" => DEFAULT_RELATIONSHIP_TYPE,
                rel_type => rel_type,
            };
            let rel = Relationship::new(from, to, rel_type);
            match builder.add_relationship(rel) {
                Ok(true) => {}
                Ok(false) => debug!("Dropped duplicate relationship"),
                Err(e) => debug!("Dropped relationship: {}", e),
            }
        }

        let graph = builder.build();
        debug!(
            "Canonical graph has {} components and {} relationships",
            graph.components().len(),
            graph.relationships().len()
        );
        graph
    }

    /// Exact case-insensitive match first, then the first similar name
    fn resolve(&self, accepted: &[(String, String)], name: &str) -> Option<String> {
        let lower = name.to_lowercase();
        accepted
            .iter()
            .find(|(existing_lower, _)| *existing_lower == lower)
            .or_else(|| {
                accepted
                    .iter()
                    .find(|(existing_lower, _)| is_similar(&lower, existing_lower, ENDPOINT_SIMILARITY))
            })
            .map(|(_, canonical)| canonical.clone())
    }
}
