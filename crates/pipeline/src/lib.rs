//! The archgraph pipeline
//!
//! This crate contains the stages that turn prose into a diagram:
//! - RelevanceFilter: keeps the sentences that describe architecture
//! - EntityExtractor: finds components and relationships
//! - Canonicalizer: merges near-duplicate names, validates relationships
//! - GraphLayout: layers and positions the canonical graph
//!
//! plus the optional suggestion providers and the `Pipeline` that runs
//! them in order.

pub mod config;
pub mod patterns;
pub mod similarity;
pub mod text;
pub mod relevance;
pub mod extractor;
pub mod canonical;
pub mod layout;
pub mod suggest;
pub mod pipeline;
pub mod error;

pub use config::{FilterConfig, PipelineConfig, ProviderKind, SuggestConfig};
pub use relevance::RelevanceFilter;
pub use extractor::{EntityExtractor, Extraction};
pub use canonical::Canonicalizer;
pub use layout::{GraphLayout, LayoutConfig};
pub use suggest::{Provider, SuggestionProvider};
pub use pipeline::{Diagram, Pipeline};
pub use error::{PipelineError, Result};
