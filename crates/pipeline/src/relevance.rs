//! Relevance filter - prunes scraped text to the sentences most likely to
//! describe architecture

use crate::config::FilterConfig;
use crate::text::{collapse_whitespace, normalize_whitespace_lower, truncate_chars};
use crate::Result;
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Architecture keywords get this multiplier in the TF-IDF score
const KEYWORD_BOOST: f64 = 2.0;

/// A sentence produced by segmentation
#[derive(Debug, Clone)]
struct Sentence {
    raw: String,
    /// Lower-cased, whitespace-collapsed
    normalized: String,
}

impl Sentence {
    fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            normalized: normalize_whitespace_lower(raw),
        }
    }
}

/// Scores and prunes raw text. Pure: the same text and configuration always
/// produce the same output.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    config: FilterConfig,
    keywords: Vec<String>,
    keyword_set: HashSet<String>,
    noise: Option<Regex>,
    boundary: Regex,
    word: Regex,
}

impl RelevanceFilter {
    pub fn new(config: FilterConfig) -> Result<Self> {
        let keywords: Vec<String> = config
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        let keyword_set = keywords.iter().cloned().collect();

        let phrases: Vec<String> = config
            .noise_phrases
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(regex::escape)
            .collect();
        let noise = if phrases.is_empty() {
            None
        } else {
            Some(
                RegexBuilder::new(&phrases.join("|"))
                    .case_insensitive(true)
                    .build()?,
            )
        };

        Ok(Self {
            config,
            keywords,
            keyword_set,
            noise,
            boundary: Regex::new(r"[.!?]+")?,
            word: Regex::new(r"\w+")?,
        })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Reduce `raw_text` to its top-scoring architecture sentences joined
    /// with `". "`. Falls back to a prefix of the raw text when too little
    /// survives.
    #[instrument(skip_all, fields(chars = raw_text.len()))]
    pub fn filter(&self, raw_text: &str) -> String {
        let text = match &self.noise {
            Some(noise) => noise.replace_all(raw_text, ""),
            None => raw_text.into(),
        };

        let sentences = self.segment(&text);
        let unique = dedup(sentences);
        let relevant: Vec<Sentence> = unique
            .into_iter()
            .filter(|s| self.is_relevant(s))
            .collect();
        debug!("{} sentences mention the architecture vocabulary", relevant.len());

        let kept: Vec<String> = self
            .rank(relevant)
            .into_iter()
            .take(self.config.top_sentences)
            .map(|s| s.raw)
            .collect();
        let filtered = collapse_whitespace(&kept.join(". "));

        if filtered.chars().count() < self.config.min_output_chars {
            debug!(
                "Filtered text too short ({} chars), using raw prefix",
                filtered.chars().count()
            );
            return truncate_chars(raw_text, self.config.fallback_chars).to_string();
        }

        filtered
    }

    fn segment(&self, text: &str) -> Vec<Sentence> {
        self.boundary
            .split(text)
            .map(str::trim)
            .filter(|s| s.chars().count() >= self.config.min_sentence_chars)
            .map(Sentence::new)
            .collect()
    }

    fn is_relevant(&self, sentence: &Sentence) -> bool {
        self.keywords
            .iter()
            .any(|kw| sentence.normalized.contains(kw.as_str()))
    }

    /// Stable sort by descending TF-IDF score
    fn rank(&self, sentences: Vec<Sentence>) -> Vec<Sentence> {
        if sentences.is_empty() {
            return sentences;
        }

        let tokenized: Vec<Vec<&str>> = sentences
            .iter()
            .map(|s| self.word.find_iter(&s.normalized).map(|m| m.as_str()).collect())
            .collect();

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for words in &tokenized {
            let distinct: HashSet<&str> = words.iter().copied().collect();
            for word in distinct {
                *doc_freq.entry(word).or_insert(0) += 1;
            }
        }

        let total_docs = sentences.len() as f64;
        let scores: Vec<f64> = tokenized
            .iter()
            .map(|words| {
                let mut counts: IndexMap<&str, usize> = IndexMap::new();
                for word in words {
                    *counts.entry(*word).or_insert(0) += 1;
                }
                counts
                    .iter()
                    .map(|(word, count)| {
                        let tf = *count as f64 / words.len() as f64;
                        let df = doc_freq.get(word).copied().unwrap_or(0) as f64;
                        let idf = (total_docs / (df + 1.0)).ln();
                        let boost = if self.keyword_set.contains(*word) {
                            KEYWORD_BOOST
                        } else {
                            1.0
                        };
                        tf * idf * boost
                    })
                    .sum()
            })
            .collect();

        let mut scored: Vec<(Sentence, f64)> = sentences.into_iter().zip(scores).collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().map(|(sentence, _)| sentence).collect()
    }
}

/// Drop repeated sentences, keeping the first occurrence
fn dedup(sentences: Vec<Sentence>) -> Vec<Sentence> {
    let mut seen = HashSet::new();
    sentences
        .into_iter()
        .filter(|s| seen.insert(s.normalized.clone()))
        .collect()
}
