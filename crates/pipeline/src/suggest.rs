//! Suggestion providers - optional model-backed hints for the extractor.
//!
//! Every failure (unreachable host, bad status, malformed JSON) is logged and
//! reported as "no suggestion"; the rule-based extractor always has the last
//! word.

use crate::config::{ProviderKind, SuggestConfig};
use crate::text::truncate_chars;
use crate::{PipelineError, Result};
use archgraph_core::Suggestion;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const TGI_MAX_NEW_TOKENS: u32 = 1024;

const SYSTEM_PROMPT: &str = "You are a strict JSON generator. Output MUST be a single JSON object matching the provided schema. No prose, no markdown.";

const EXTRACTION_PROMPT: &str = r#"You are a system architecture expert. Analyze the following text and extract ONLY the system components and their relationships.

Rules:
- Component names are short (like "API Gateway", "Load Balancer", "User Service", "Database")
- Relationships show how components communicate
- Focus on architectural components, not features or concepts
- Return ONLY valid JSON, no explanations, no markdown

Return EXACTLY this JSON format:
{"components":["Component1","Component2"],"relationships":[{"from":"Component1","to":"Component2","type":"request"}]}

Text to analyze:
"#;

/// Something that can propose components and relationships for a text
#[allow(async_fn_in_trait)]
pub trait SuggestionProvider {
    /// `None` when the provider is disabled, unreachable or unhelpful
    async fn suggest(&self, text: &str) -> Option<Suggestion>;
}

/// Prompt for `text`, truncated to `max_chars` characters
pub fn extraction_prompt(text: &str, max_chars: usize) -> String {
    format!("{}{}", EXTRACTION_PROMPT, truncate_chars(text, max_chars))
}

/// Decode a model reply into a [`Suggestion`]
pub fn parse_suggestion(payload: &str) -> Result<Suggestion> {
    let cleaned = normalize_json_payload(payload)?;
    if cleaned.is_empty() {
        return Err(PipelineError::Provider("empty response".to_string()));
    }
    Ok(Suggestion::from_json(&cleaned)?)
}

/// Remove every code fence marker, then keep the span from the first `{`
/// to the last `}`. Replies without braces are returned trimmed.
fn normalize_json_payload(payload: &str) -> Result<String> {
    let fences = Regex::new(r"```(?:json)?\s*")?;
    let unfenced = fences.replace_all(payload, "");
    let object = Regex::new(r"\{[\s\S]*\}")?;
    Ok(object
        .find(&unfenced)
        .map_or_else(|| unfenced.trim(), |m| m.as_str())
        .to_string())
}

fn suggestion_schema() -> Value {
    json!({
        "type": "object",
        "required": ["components", "relationships"],
        "properties": {
            "components": {
                "type": "array",
                "items": { "type": "string", "maxLength": 80 }
            },
            "relationships": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["from", "to", "type"],
                    "properties": {
                        "from": { "type": "string" },
                        "to": { "type": "string" },
                        "type": { "type": "string" }
                    }
                }
            }
        }
    })
}

fn http_client(timeout_secs: u64) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Shared tail of every provider: log the failure, hide it from the caller
fn settle(provider: &str, result: Result<Suggestion>) -> Option<Suggestion> {
    match result {
        Ok(suggestion) if suggestion.is_empty() => {
            debug!("{} returned an empty suggestion", provider);
            None
        }
        Ok(suggestion) => {
            debug!(
                "{} suggested {} components and {} relationships",
                provider,
                suggestion.components.len(),
                suggestion.relationships.len()
            );
            Some(suggestion)
        }
        Err(e) => {
            warn!("{} suggestion failed: {}", provider, e);
            None
        }
    }
}

/// The no-op provider
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuggestion;

impl SuggestionProvider for NoSuggestion {
    async fn suggest(&self, _text: &str) -> Option<Suggestion> {
        None
    }
}

#[derive(Debug, Serialize)]
struct TgiGenerateRequest {
    inputs: String,
    parameters: TgiParameters,
}

#[derive(Debug, Serialize)]
struct TgiParameters {
    max_new_tokens: u32,
    return_full_text: bool,
}

/// Hugging Face text-generation-inference
#[derive(Debug, Clone)]
pub struct TgiSuggester {
    client: Client,
    base_url: String,
    max_chars: usize,
}

impl TgiSuggester {
    pub fn new(config: &SuggestConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_chars: config.max_chars,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(&self, text: &str) -> Result<Suggestion> {
        let url = format!("{}/generate", self.base_url);
        let request = TgiGenerateRequest {
            inputs: extraction_prompt(text, self.max_chars),
            parameters: TgiParameters {
                max_new_tokens: TGI_MAX_NEW_TOKENS,
                return_full_text: false,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<TgiResponse>()
            .await?;

        parse_suggestion(&response.into_generated_text()?)
    }
}

impl SuggestionProvider for TgiSuggester {
    #[instrument(skip_all, fields(provider = "tgi"))]
    async fn suggest(&self, text: &str) -> Option<Suggestion> {
        settle("TGI", self.request(text).await)
    }
}

#[derive(Debug, Deserialize)]
struct TgiGeneration {
    generated_text: String,
}

/// `/generate` returns one generation, or a batch of them for list inputs
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TgiResponse {
    Single(TgiGeneration),
    Batch(Vec<TgiGeneration>),
}

impl TgiResponse {
    fn into_generated_text(self) -> Result<String> {
        match self {
            TgiResponse::Single(generation) => Ok(generation.generated_text),
            TgiResponse::Batch(batch) => batch
                .into_iter()
                .next()
                .map(|generation| generation.generated_text)
                .ok_or_else(|| PipelineError::Provider("TGI returned no generations".to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaChatMessage>,
    stream: bool,
    format: Value,
    options: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaChatMessage,
    #[serde(default)]
    done_reason: Option<String>,
}

/// Ollama chat API with a JSON-schema constrained reply
#[derive(Debug, Clone)]
pub struct OllamaSuggester {
    client: Client,
    base_url: String,
    model: String,
    max_chars: usize,
}

impl OllamaSuggester {
    pub fn new(config: &SuggestConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_chars: config.max_chars,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(&self, text: &str) -> Result<Suggestion> {
        let url = format!("{}/api/chat", self.base_url);
        let request = OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![
                OllamaChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                OllamaChatMessage {
                    role: "user".to_string(),
                    content: extraction_prompt(text, self.max_chars),
                },
            ],
            stream: false,
            format: suggestion_schema(),
            options: json!({ "temperature": 0 }),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<OllamaChatResponse>()
            .await?;

        if let Some(reason) = response.done_reason.as_deref() {
            debug!("Ollama chat done_reason={}", reason);
        }

        parse_suggestion(&response.message.content)
    }
}

impl SuggestionProvider for OllamaSuggester {
    #[instrument(skip_all, fields(provider = "ollama", model = %self.model))]
    async fn suggest(&self, text: &str) -> Option<Suggestion> {
        settle("Ollama", self.request(text).await)
    }
}

/// Google Gemini `generateContent`
#[derive(Debug, Clone)]
pub struct GeminiSuggester {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    max_chars: usize,
}

impl GeminiSuggester {
    /// Fails when no API key is configured
    pub fn new(config: &SuggestConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| PipelineError::Config("GEMINI_API_KEY not set".to_string()))?;
        Ok(Self {
            client: http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            max_chars: config.max_chars,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(&self, text: &str) -> Result<Suggestion> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = json!({
            "contents": [{ "parts": [{ "text": extraction_prompt(text, self.max_chars) }] }],
            "generationConfig": { "temperature": 0, "responseMimeType": "application/json" }
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        let generated = response
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .ok_or_else(|| PipelineError::Provider("Gemini response has no candidate text".to_string()))?;

        parse_suggestion(generated)
    }
}

impl SuggestionProvider for GeminiSuggester {
    #[instrument(skip_all, fields(provider = "gemini", model = %self.model))]
    async fn suggest(&self, text: &str) -> Option<Suggestion> {
        settle("Gemini", self.request(text).await)
    }
}

/// The configured provider
#[derive(Debug, Clone)]
pub enum Provider {
    Disabled(NoSuggestion),
    Tgi(TgiSuggester),
    Ollama(OllamaSuggester),
    Gemini(GeminiSuggester),
}

impl Provider {
    /// Build the provider `config` names. An unconfigured Gemini (no key)
    /// degrades to [`Provider::Disabled`].
    pub fn from_config(config: &SuggestConfig) -> Result<Self> {
        let provider = match config.provider {
            ProviderKind::Disabled => Self::Disabled(NoSuggestion),
            ProviderKind::Tgi => Self::Tgi(TgiSuggester::new(config)?),
            ProviderKind::Ollama => Self::Ollama(OllamaSuggester::new(config)?),
            ProviderKind::Gemini => match GeminiSuggester::new(config) {
                Ok(gemini) => Self::Gemini(gemini),
                Err(PipelineError::Config(reason)) => {
                    warn!("{}, suggestions disabled", reason);
                    Self::Disabled(NoSuggestion)
                }
                Err(e) => return Err(e),
            },
        };
        info!("Suggestion provider: {}", provider.kind());
        Ok(provider)
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Disabled(_) => ProviderKind::Disabled,
            Provider::Tgi(_) => ProviderKind::Tgi,
            Provider::Ollama(_) => ProviderKind::Ollama,
            Provider::Gemini(_) => ProviderKind::Gemini,
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::Disabled(NoSuggestion)
    }
}

impl SuggestionProvider for Provider {
    async fn suggest(&self, text: &str) -> Option<Suggestion> {
        match self {
            Provider::Disabled(p) => p.suggest(text).await,
            Provider::Tgi(p) => p.suggest(text).await,
            Provider::Ollama(p) => p.suggest(text).await,
            Provider::Gemini(p) => p.suggest(text).await,
        }
    }
}
