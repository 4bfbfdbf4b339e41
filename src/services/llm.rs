//! Text-generation service for AI-backed coaching
//!
//! Provides the [`TextGenerator`] capability trait plus an
//! OpenAI-compatible Chat Completions client. Callers (rating, coaching,
//! notes Q&A) hold a `dyn TextGenerator`, treat every failure as a signal
//! to fall back to the deterministic engine, and never retry here.

use crate::error::{PitchdrillError, Result};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;

/// Configuration for the generation client
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key (Bearer token)
    pub api_key: String,

    /// Model to use (default: gpt-4o-mini)
    pub model: String,

    /// API base URL, without the trailing endpoint path
    pub base_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

/// Per-call sampling knobs.
///
/// Each caller picks its own budget: coaching turns run warmer and
/// shorter than transcript ratings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateOptions {
    /// Max tokens for the completion
    pub max_tokens: usize,

    /// Temperature for sampling
    pub temperature: f32,
}

impl GenerateOptions {
    pub fn new(max_tokens: usize, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.7,
        }
    }
}

/// Capability to turn a prompt into completion text.
///
/// The single operation is fallible; callers own the fallback policy.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, options: GenerateOptions) -> Result<String>;
}

/// OpenAI-compatible Chat Completions client
pub struct OpenAiGenerator {
    config: LlmConfig,
    client: reqwest::Client,
}

/// Chat Completions request format
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat Completions response format
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiGenerator {
    /// Create a new client with custom config
    pub fn new(config: LlmConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(PitchdrillError::Config(config::ConfigError::Message(
                "OPENAI_API_KEY not set".to_string(),
            )));
        }

        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    /// Create with config read from the environment
    pub fn from_env() -> Result<Self> {
        Self::new(LlmConfig::default())
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str, options: GenerateOptions) -> Result<String> {
        debug!(
            model = %self.config.model,
            prompt_chars = prompt.chars().count(),
            "Calling Chat Completions API"
        );

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(PitchdrillError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PitchdrillError::LlmApi(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| PitchdrillError::LlmApi(format!("Failed to parse response: {}", e)))?;

        let content = api_response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(PitchdrillError::LlmApi(
                "Empty response from API".to_string(),
            ));
        }
        Ok(content.to_string())
    }
}
