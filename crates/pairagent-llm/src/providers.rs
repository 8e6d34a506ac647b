//! LLM Provider implementations

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::*;

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Trait for LLM providers
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Get the provider kind
    fn kind(&self) -> ProviderKind;

    /// Check if the provider has what it needs to serve requests
    async fn is_available(&self) -> bool;

    /// Complete a conversation
    async fn complete(&self, request: CompletionRequest) -> Result<Completion>;
}

fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client with timeout: {}", e);
            reqwest::Client::new()
        })
}

// ============================================================================
// OpenAI and OpenAI-Compatible Provider
// ============================================================================

/// Configuration for OpenAI and OpenAI-compatible providers
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub base_url: String,
    /// Optional for self-hosted compatible servers
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: None,
            model: DEFAULT_OPENAI_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// OpenAI chat-completions provider
pub struct OpenAIProvider {
    config: OpenAIConfig,
    kind: ProviderKind,
    client: reqwest::Client,
}

impl OpenAIProvider {
    /// The hosted OpenAI API
    pub fn new(config: OpenAIConfig) -> Self {
        Self::with_kind(config, ProviderKind::OpenAI)
    }

    /// A self-hosted server speaking the OpenAI protocol
    pub fn compat(config: OpenAIConfig) -> Self {
        Self::with_kind(config, ProviderKind::OpenAICompat)
    }

    fn with_kind(config: OpenAIConfig, kind: ProviderKind) -> Self {
        let client = http_client(config.timeout);
        Self {
            config,
            kind,
            client,
        }
    }
}

#[derive(Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<OpenAIChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct OpenAIChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct OpenAIReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIChatResponse {
    choices: Vec<OpenAIChatChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

#[derive(Deserialize)]
struct OpenAIChatChoice {
    message: OpenAIReply,
}

#[derive(Deserialize)]
struct OpenAIUsage {
    total_tokens: u32,
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        match self.kind {
            ProviderKind::OpenAICompat => "OpenAI-Compatible",
            _ => "OpenAI",
        }
    }

    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn is_available(&self) -> bool {
        match self.kind {
            // Local servers often run without auth
            ProviderKind::OpenAICompat => true,
            _ => self.config.api_key.as_deref().is_some_and(|k| !k.is_empty()),
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion> {
        let messages = vec![
            OpenAIChatMessage {
                role: "system",
                content: request.system,
            },
            OpenAIChatMessage {
                role: "user",
                content: request.prompt,
            },
        ];

        let chat_request = OpenAIChatRequest {
            model: self.config.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
            response_format: request
                .json_mode
                .then(|| serde_json::json!({"type": "json_object"})),
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let mut req = self.client.post(&url).json(&chat_request);
        if let Some(ref key) = self.config.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.map_err(|e| LLMError::NetworkError {
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LLMError::RequestFailed {
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let chat_response: OpenAIChatResponse =
            response.json().await.map_err(|e| LLMError::InvalidResponse {
                message: e.to_string(),
            })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LLMError::EmptyResponse {
                provider: self.name().to_string(),
            })?;

        Ok(Completion {
            content,
            model: self.config.model.clone(),
            total_tokens: chat_response.usage.map(|u| u.total_tokens),
        })
    }
}

// ============================================================================
// Anthropic Provider
// ============================================================================

/// Configuration for Anthropic provider
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_ANTHROPIC_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Anthropic Claude API provider
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> Self {
        let client = http_client(config.timeout);
        Self { config, client }
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    usage: AnthropicUsage,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "Anthropic"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn is_available(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion> {
        // No JSON response format here, so the instruction rides in the system prompt
        let system = if request.json_mode {
            request.system + "\n\nIMPORTANT: Respond with a single valid JSON object only."
        } else {
            request.system
        };

        let anthropic_request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: request.max_tokens.unwrap_or(1024),
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: request.prompt,
            }],
            temperature: request.temperature,
        };

        let url = format!("{}/messages", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&anthropic_request)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LLMError::RequestFailed {
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let anthropic_response: AnthropicResponse =
            response.json().await.map_err(|e| LLMError::InvalidResponse {
                message: e.to_string(),
            })?;

        let content: String = anthropic_response
            .content
            .iter()
            .map(|c| c.text.as_str())
            .collect();

        if content.trim().is_empty() {
            return Err(LLMError::EmptyResponse {
                provider: self.name().to_string(),
            });
        }

        let usage = &anthropic_response.usage;
        Ok(Completion {
            content,
            model: self.config.model.clone(),
            total_tokens: Some(usage.input_tokens + usage.output_tokens),
        })
    }
}
