//! Request and response shapes shared by the providers

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("Provider not configured: {provider}")]
    ProviderNotConfigured { provider: String },

    #[error("Request failed: {message}")]
    RequestFailed { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Empty response from {provider}")]
    EmptyResponse { provider: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },
}

pub type Result<T> = std::result::Result<T, LLMError>;

/// A single-turn completion: one system prompt and one user prompt
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask for a single JSON object as output
    pub json_mode: bool,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
            json_mode: false,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn json(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub model: String,
    /// Prompt plus completion tokens, when the provider reports them
    pub total_tokens: Option<u32>,
}

impl Completion {
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            total_tokens: None,
        }
    }
}

/// Which backend serves completions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Pick from whichever API key is present (OpenAI first)
    #[default]
    Auto,
    OpenAI,
    /// Self-hosted server speaking the OpenAI protocol
    OpenAICompat,
    Anthropic,
    Disabled,
}

impl ProviderKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => Some(Self::Auto),
            "openai" => Some(Self::OpenAI),
            "openai_compat" | "openai-compat" | "openaicompat" => Some(Self::OpenAICompat),
            "anthropic" | "claude" => Some(Self::Anthropic),
            "disabled" | "none" | "off" => Some(Self::Disabled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::OpenAI => "openai",
            Self::OpenAICompat => "openai_compat",
            Self::Anthropic => "anthropic",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
