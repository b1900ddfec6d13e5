//! Text in, positioned architecture graph out

use crate::canonical::Canonicalizer;
use crate::config::PipelineConfig;
use crate::extractor::EntityExtractor;
use crate::layout::GraphLayout;
use crate::relevance::RelevanceFilter;
use crate::suggest::{Provider, SuggestionProvider};
use crate::Result;
use archgraph_core::{Graph, PositionedGraph, Suggestion};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Result of a full run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    pub graph: Graph,
    pub layout: PositionedGraph,
}

/// The four stages wired together, plus an optional suggestion provider
/// consulted between filtering and extraction
#[derive(Debug, Clone)]
pub struct Pipeline<P = Provider> {
    filter: RelevanceFilter,
    extractor: EntityExtractor,
    canonicalizer: Canonicalizer,
    layout: GraphLayout,
    provider: P,
}

impl Pipeline<Provider> {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let provider = Provider::from_config(&config.suggest)?;
        Self::with_provider(config, provider)
    }
}

impl<P: SuggestionProvider> Pipeline<P> {
    pub fn with_provider(config: PipelineConfig, provider: P) -> Result<Self> {
        Ok(Self {
            filter: RelevanceFilter::new(config.filter)?,
            extractor: EntityExtractor::new()?,
            canonicalizer: Canonicalizer::new()?,
            layout: GraphLayout::default(),
            provider,
        })
    }

    pub fn filter(&self) -> &RelevanceFilter {
        &self.filter
    }

    pub fn layout(&self) -> &GraphLayout {
        &self.layout
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Filter, ask the provider, then run the synchronous stages
    #[instrument(skip_all, fields(chars = raw_text.len()))]
    pub async fn run(&self, raw_text: &str) -> Diagram {
        let filtered = self.filter.filter(raw_text);
        let suggestion = self.provider.suggest(&filtered).await;
        self.run_filtered(&filtered, suggestion.as_ref())
    }

    /// Same as [`Pipeline::run`] with the suggestion supplied by the caller
    pub fn run_with_suggestion(&self, raw_text: &str, suggestion: Option<&Suggestion>) -> Diagram {
        let filtered = self.filter.filter(raw_text);
        self.run_filtered(&filtered, suggestion)
    }

    /// Extraction and canonicalization only, optionally with a provider
    /// suggestion
    pub async fn extract_graph(&self, raw_text: &str) -> Graph {
        let filtered = self.filter.filter(raw_text);
        let suggestion = self.provider.suggest(&filtered).await;
        self.canonical_graph(&filtered, suggestion.as_ref())
    }

    fn canonical_graph(&self, filtered: &str, suggestion: Option<&Suggestion>) -> Graph {
        let extraction = self.extractor.extract(filtered, suggestion);
        self.canonicalizer
            .canonicalize(&extraction.components, &extraction.relationships)
    }

    fn run_filtered(&self, filtered: &str, suggestion: Option<&Suggestion>) -> Diagram {
        let graph = self.canonical_graph(filtered, suggestion);
        let layout = self.layout.layout(&graph);
        info!(
            "Generated diagram with {} components and {} relationships",
            graph.components().len(),
            graph.relationships().len()
        );
        Diagram { graph, layout }
    }
}
