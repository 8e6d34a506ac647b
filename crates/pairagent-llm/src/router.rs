//! LLM Router - selects and holds the configured provider

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::providers::*;
use crate::types::*;

/// Provider selection settings, usually embedded in the service config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMSettings {
    /// `auto`, `openai`, `openai_compat`, `anthropic`, or `disabled`
    pub provider: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LLMSettings {
    fn default() -> Self {
        Self {
            provider: "auto".to_string(),
            model: None,
            base_url: None,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LLMSettings {
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// The LLM Router owns the one provider used for planning
#[derive(Clone)]
pub struct LLMRouter {
    provider: Arc<dyn LLMProvider>,
    kind: ProviderKind,
}

impl LLMRouter {
    /// Create a router with a specific provider
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        let kind = provider.kind();
        Self { provider, kind }
    }

    /// Create a router from settings, using conventional environment
    /// variables (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`) for missing keys.
    ///
    /// Returns `None` when LLM planning is disabled or no usable
    /// credentials are present.
    pub fn from_settings(settings: &LLMSettings) -> Option<Self> {
        let kind = match ProviderKind::parse(&settings.provider) {
            Some(kind) => kind,
            None => {
                tracing::warn!(
                    "Unknown LLM provider '{}', LLM planning disabled",
                    settings.provider
                );
                return None;
            }
        };

        let explicit_key = settings.api_key.clone().filter(|k| !k.trim().is_empty());

        let kind = match kind {
            ProviderKind::Auto => {
                if explicit_key.is_some() || env_key("OPENAI_API_KEY").is_some() {
                    ProviderKind::OpenAI
                } else if env_key("ANTHROPIC_API_KEY").is_some() {
                    ProviderKind::Anthropic
                } else {
                    tracing::info!("No LLM API key found, using rule-based planning only");
                    return None;
                }
            }
            other => other,
        };

        let provider: Arc<dyn LLMProvider> = match kind {
            ProviderKind::OpenAI => {
                let Some(api_key) = explicit_key.or_else(|| env_key("OPENAI_API_KEY")) else {
                    tracing::warn!("OpenAI API key not found, LLM planning disabled");
                    return None;
                };
                Arc::new(OpenAIProvider::new(OpenAIConfig {
                    base_url: settings
                        .base_url
                        .clone()
                        .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
                    api_key: Some(api_key),
                    model: settings
                        .model
                        .clone()
                        .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                    timeout: settings.timeout(),
                }))
            }
            ProviderKind::OpenAICompat => {
                let Some(base_url) = settings.base_url.clone() else {
                    tracing::warn!("OpenAI-compatible provider needs a base_url, LLM planning disabled");
                    return None;
                };
                Arc::new(OpenAIProvider::compat(OpenAIConfig {
                    base_url,
                    api_key: explicit_key,
                    model: settings.model.clone().unwrap_or_else(|| "default".to_string()),
                    timeout: settings.timeout(),
                }))
            }
            ProviderKind::Anthropic => {
                let Some(api_key) = explicit_key.or_else(|| env_key("ANTHROPIC_API_KEY")) else {
                    tracing::warn!("Anthropic API key not found, LLM planning disabled");
                    return None;
                };
                let mut config = AnthropicConfig::new(api_key);
                if let Some(ref url) = settings.base_url {
                    config.base_url = url.clone();
                }
                if let Some(ref model) = settings.model {
                    config.model = model.clone();
                }
                config.timeout = settings.timeout();
                Arc::new(AnthropicProvider::new(config))
            }
            ProviderKind::Auto | ProviderKind::Disabled => return None,
        };

        tracing::info!("LLM planning enabled via {}", provider.name());
        Some(Self::new(provider))
    }

    /// Create a router from the environment alone
    pub fn from_env() -> Option<Self> {
        Self::from_settings(&LLMSettings::default())
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Complete a request using the configured provider
    pub async fn complete(&self, request: CompletionRequest) -> Result<Completion> {
        if !self.provider.is_available().await {
            return Err(LLMError::ProviderNotConfigured {
                provider: self.provider.name().to_string(),
            });
        }
        self.provider.complete(request).await
    }
}

impl std::fmt::Debug for LLMRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMRouter")
            .field("provider", &self.provider.name())
            .field("kind", &self.kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoProvider;

    #[async_trait]
    impl LLMProvider for EchoProvider {
        fn name(&self) -> &'static str {
            "Echo"
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::OpenAICompat
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn complete(&self, request: CompletionRequest) -> Result<Completion> {
            Ok(Completion::new(request.prompt, "echo"))
        }
    }

    #[tokio::test]
    async fn test_router_delegates() {
        let router = LLMRouter::new(Arc::new(EchoProvider));
        assert_eq!(router.kind(), ProviderKind::OpenAICompat);

        let response = router
            .complete(CompletionRequest::new("Repeat the prompt.", "ping"))
            .await
            .unwrap();
        assert_eq!(response.content, "ping");
        assert_eq!(response.model, "echo");
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!(ProviderKind::parse("openai"), Some(ProviderKind::OpenAI));
        assert_eq!(ProviderKind::parse("claude"), Some(ProviderKind::Anthropic));
        assert_eq!(ProviderKind::parse(""), Some(ProviderKind::Auto));
        assert_eq!(ProviderKind::parse("off"), Some(ProviderKind::Disabled));
        assert_eq!(ProviderKind::parse("gemini"), None);
    }

    #[test]
    fn test_disabled_and_unknown_yield_no_router() {
        let settings = LLMSettings {
            provider: "disabled".to_string(),
            ..Default::default()
        };
        assert!(LLMRouter::from_settings(&settings).is_none());

        let settings = LLMSettings {
            provider: "gemini".to_string(),
            ..Default::default()
        };
        assert!(LLMRouter::from_settings(&settings).is_none());
    }

    #[test]
    fn test_explicit_settings_build_router() {
        let settings = LLMSettings {
            provider: "openai".to_string(),
            api_key: Some("sk-test".to_string()),
            model: Some("gpt-4o".to_string()),
            ..Default::default()
        };
        let router = LLMRouter::from_settings(&settings).unwrap();
        assert_eq!(router.kind(), ProviderKind::OpenAI);

        let settings = LLMSettings {
            provider: "openai_compat".to_string(),
            base_url: Some("http://localhost:8000/v1".to_string()),
            ..Default::default()
        };
        let router = LLMRouter::from_settings(&settings).unwrap();
        assert_eq!(router.provider_name(), "OpenAI-Compatible");
    }
}
