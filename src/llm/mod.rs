//! LLM client for article rewriting
//!
//! This module talks to a text-generation API (Google Gemini or a local
//! Ollama server) with a single blocking-style request per prompt. There are
//! no retries: a failed call drops the article for this run.

pub mod response;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{LlmConfig, LlmProvider};
use crate::utils::error::LlmError;

pub use response::{parse_response, DEFAULT_CATEGORY, FALLBACK_CATEGORY};

/// Something that turns a prompt into raw text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Generate text for a prompt
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Check if the model can be reached
    async fn is_available(&self) -> bool {
        true
    }
}

/// Ollama generate request
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

/// Ollama generation options
#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama generate response
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Gemini generateContent request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

/// Gemini generateContent response
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiResponse {
    /// Text of the first candidate, parts concatenated
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// HTTP client for the configured provider
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

impl LlmClient {
    /// Create a new LLM client with custom config
    pub fn with_config(config: LlmConfig) -> Result<Self, LlmError> {
        if config.provider == LlmProvider::Gemini
            && config.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
        {
            return Err(LlmError::MissingApiKey(config.provider.as_str().to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Active configuration
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Generate text using Ollama
    async fn generate_ollama(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.config.endpoint());

        let request = OllamaRequest {
            model: self.config.model(),
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let response = check_status(response).await?;

        let ollama_response: OllamaResponse = response.json().await?;
        if ollama_response.response.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(ollama_response.response)
    }

    /// Generate text using Gemini
    async fn generate_gemini(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint(),
            self.config.model()
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.config.api_key.as_deref().unwrap_or_default())
            .json(&request)
            .send()
            .await?;
        let response = check_status(response).await?;

        let gemini_response: GeminiResponse = response.json().await?;
        gemini_response.into_text().ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    fn name(&self) -> &str {
        self.config.model()
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        tracing::debug!(
            provider = self.config.provider.as_str(),
            model = self.config.model(),
            prompt_chars = prompt.chars().count(),
            "Sending prompt"
        );

        match self.config.provider {
            LlmProvider::Gemini => self.generate_gemini(prompt).await,
            LlmProvider::Ollama => self.generate_ollama(prompt).await,
        }
    }

    /// Ollama: the tag list answers; Gemini: the model resource exists for this key
    async fn is_available(&self) -> bool {
        let request = match self.config.provider {
            LlmProvider::Ollama => self
                .client
                .get(format!("{}/api/tags", self.config.endpoint())),
            LlmProvider::Gemini => self
                .client
                .get(format!(
                    "{}/v1beta/models/{}",
                    self.config.endpoint(),
                    self.config.model()
                ))
                .header("x-goog-api-key", self.config.api_key.as_deref().unwrap_or_default()),
        };

        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Model availability check failed: {e}");
                false
            }
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(LlmError::Status {
        status,
        body: crate::utils::truncate_text(&body, 500),
    })
}
