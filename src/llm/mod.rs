//! LLM provider abstraction.
//!
//! Providers are selected from a closed set by name; each one turns the
//! provider-agnostic conversation into its own wire format.

mod gemini;
mod mock;
mod ollama;
mod types;

pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use types::{
    FunctionCall, FunctionResponse, FunctionResult, GenerationOptions, LlmResponse, Message,
    ParameterSpec, Role, ToolArgs, ToolDefinition, ToolParameters,
};

use crate::config::LlmSettings;
use crate::error::{RagentError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for LLM provider implementations.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider identifier.
    fn name(&self) -> &str;

    /// Generate the next reply for a conversation.
    ///
    /// `tools` is `None` when no tools should be offered to the model.
    async fn generate(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        options: &GenerationOptions,
    ) -> Result<LlmResponse>;
}

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Ollama,
    Mock,
}

impl std::str::FromStr for ProviderKind {
    type Err = RagentError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "ollama" => Ok(ProviderKind::Ollama),
            "mock" => Ok(ProviderKind::Mock),
            _ => Err(RagentError::UnsupportedProvider(s.to_lowercase())),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::Ollama => write!(f, "ollama"),
            ProviderKind::Mock => write!(f, "mock"),
        }
    }
}

/// Create a provider of the given kind.
///
/// `model` overrides the configured model when set.
pub fn create_provider(
    kind: ProviderKind,
    model: Option<&str>,
    settings: &LlmSettings,
) -> Result<Arc<dyn LlmProvider>> {
    let model = model.unwrap_or(&settings.model);

    let provider: Arc<dyn LlmProvider> = match kind {
        ProviderKind::Gemini => {
            let api_key = settings.resolved_google_api_key().ok_or_else(|| {
                RagentError::Config(
                    "Gemini provider requires llm.google_api_key or GOOGLE_API_KEY".to_string(),
                )
            })?;
            Arc::new(GeminiProvider::new(&api_key, model, settings.timeout_secs)?)
        }
        ProviderKind::Ollama => Arc::new(OllamaProvider::new(
            &settings.ollama_base_url,
            model,
            settings.timeout_secs,
        )?),
        ProviderKind::Mock => Arc::new(MockProvider::new()),
    };

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!("Ollama".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);
        assert_eq!("MOCK".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);
    }

    #[test]
    fn test_unknown_provider_lists_supported() {
        let err = "OpenAI".parse::<ProviderKind>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown LLM provider: 'openai'. Supported providers: gemini, ollama, mock"
        );
    }

    #[test]
    fn test_create_mock_provider() {
        let provider = create_provider(ProviderKind::Mock, None, &LlmSettings::default()).unwrap();
        assert_eq!(provider.name(), "mock");
    }

    #[test]
    fn test_create_ollama_provider_uses_model_override() {
        let provider = create_provider(
            ProviderKind::Ollama,
            Some("llama3.1"),
            &LlmSettings::default(),
        )
        .unwrap();
        assert_eq!(provider.name(), "ollama");
    }
}
