//! Pipeline configuration, read from the environment with built-in defaults

use crate::patterns::{ARCHITECTURE_KEYWORDS, NOISE_PHRASES};
use crate::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const DEFAULT_TOP_SENTENCES: usize = 30;
const DEFAULT_MIN_SENTENCE_CHARS: usize = 20;
const DEFAULT_MIN_OUTPUT_CHARS: usize = 100;
const DEFAULT_FALLBACK_CHARS: usize = 2000;
const DEFAULT_SUGGEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SUGGEST_MAX_CHARS: usize = 4000;
const DEFAULT_TGI_URL: &str = "http://localhost:8082";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "phi4-mini:latest";
const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

/// Relevance filter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Sentences kept after scoring
    pub top_sentences: usize,
    /// Sentences shorter than this (after trimming) are discarded
    pub min_sentence_chars: usize,
    /// Filtered output shorter than this falls back to the raw text
    pub min_output_chars: usize,
    /// Length of the raw-text fallback
    pub fallback_chars: usize,
    /// Architecture vocabulary, lower-case
    pub keywords: Vec<String>,
    /// Boilerplate phrases removed before segmentation
    pub noise_phrases: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            top_sentences: DEFAULT_TOP_SENTENCES,
            min_sentence_chars: DEFAULT_MIN_SENTENCE_CHARS,
            min_output_chars: DEFAULT_MIN_OUTPUT_CHARS,
            fallback_chars: DEFAULT_FALLBACK_CHARS,
            keywords: ARCHITECTURE_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            noise_phrases: NOISE_PHRASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FilterConfig {
    pub fn from_env() -> Self {
        Self {
            top_sentences: env_usize("FILTER_TOP_SENTENCES", DEFAULT_TOP_SENTENCES),
            min_sentence_chars: env_usize("FILTER_MIN_SENTENCE_CHARS", DEFAULT_MIN_SENTENCE_CHARS),
            min_output_chars: env_usize("FILTER_MIN_OUTPUT_CHARS", DEFAULT_MIN_OUTPUT_CHARS),
            fallback_chars: env_usize("FILTER_FALLBACK_CHARS", DEFAULT_FALLBACK_CHARS),
            ..Self::default()
        }
    }

    /// Builder: set the number of sentences kept
    pub fn with_top_sentences(mut self, top: usize) -> Self {
        self.top_sentences = top;
        self
    }
}

/// Which external suggestion provider to consult
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// No provider; extraction is purely rule-based
    #[default]
    Disabled,
    /// Hugging Face text-generation-inference
    Tgi,
    /// Ollama chat API
    Ollama,
    /// Google Gemini
    Gemini,
}

impl FromStr for ProviderKind {
    type Err = PipelineError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "disabled" | "off" | "rules" => Ok(Self::Disabled),
            "tgi" | "huggingface" => Ok(Self::Tgi),
            "ollama" => Ok(Self::Ollama),
            "gemini" => Ok(Self::Gemini),
            other => Err(PipelineError::Config(format!(
                "unknown suggestion provider '{}' (expected disabled, tgi, ollama or gemini)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Disabled => write!(f, "disabled"),
            ProviderKind::Tgi => write!(f, "tgi"),
            ProviderKind::Ollama => write!(f, "ollama"),
            ProviderKind::Gemini => write!(f, "gemini"),
        }
    }
}

/// Suggestion provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    pub provider: ProviderKind,
    pub base_url: String,
    pub model: String,
    /// Only used by Gemini; absent means the provider is unconfigured
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Text sent to the provider is truncated to this many characters
    pub max_chars: usize,
}

impl SuggestConfig {
    /// Settings for `provider`, with URL and model defaults for that provider
    pub fn for_provider(provider: ProviderKind) -> Self {
        let (base_url, model) = match provider {
            ProviderKind::Disabled => ("", ""),
            ProviderKind::Tgi => (DEFAULT_TGI_URL, ""),
            ProviderKind::Ollama => (DEFAULT_OLLAMA_URL, DEFAULT_OLLAMA_MODEL),
            ProviderKind::Gemini => (DEFAULT_GEMINI_URL, DEFAULT_GEMINI_MODEL),
        };
        Self {
            provider,
            base_url: base_url.to_string(),
            model: model.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_SUGGEST_TIMEOUT_SECS,
            max_chars: DEFAULT_SUGGEST_MAX_CHARS,
        }
    }

    /// Read `SUGGEST_*` variables; `provider` overrides `SUGGEST_PROVIDER`
    pub fn from_env(provider: Option<ProviderKind>) -> Result<Self> {
        let provider = match provider {
            Some(provider) => provider,
            None => env_or_default("SUGGEST_PROVIDER", "disabled").parse()?,
        };
        let defaults = Self::for_provider(provider);
        Ok(Self {
            provider,
            base_url: env_or_default("SUGGEST_URL", &defaults.base_url),
            model: env_or_default("SUGGEST_MODEL", &defaults.model),
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            timeout_secs: env_u64("SUGGEST_TIMEOUT_SECS", defaults.timeout_secs),
            max_chars: env_usize("SUGGEST_MAX_CHARS", defaults.max_chars),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self::for_provider(ProviderKind::Disabled)
    }
}

/// Everything a [`crate::Pipeline`] needs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub filter: FilterConfig,
    pub suggest: SuggestConfig,
}

impl PipelineConfig {
    pub fn from_env(provider: Option<ProviderKind>) -> Result<Self> {
        Ok(Self {
            filter: FilterConfig::from_env(),
            suggest: SuggestConfig::from_env(provider)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults() {
        let config = FilterConfig::default();
        assert_eq!(config.top_sentences, 30);
        assert_eq!(config.min_sentence_chars, 20);
        assert_eq!(config.min_output_chars, 100);
        assert_eq!(config.fallback_chars, 2000);
        assert!(config.keywords.iter().any(|k| k == "load balancer"));
        assert!(config.noise_phrases.iter().any(|p| p == "privacy policy"));
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("Ollama".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);
        assert_eq!("huggingface".parse::<ProviderKind>().unwrap(), ProviderKind::Tgi);
        assert_eq!("".parse::<ProviderKind>().unwrap(), ProviderKind::Disabled);
        assert!("cohere".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::Gemini.to_string(), "gemini");
    }

    #[test]
    fn test_suggest_defaults_per_provider() {
        let ollama = SuggestConfig::for_provider(ProviderKind::Ollama);
        assert_eq!(ollama.base_url, "http://localhost:11434");
        assert_eq!(ollama.max_chars, 4000);

        let disabled = SuggestConfig::default();
        assert_eq!(disabled.provider, ProviderKind::Disabled);
        assert!(disabled.api_key.is_none());
    }
}
