//! Embedding generation for semantic search and retrieval.

mod gemini;
mod openai;

pub use gemini::GeminiEmbedder;
pub use openai::OpenAIEmbedder;

use crate::config::{EmbeddingSettings, LlmSettings};
use crate::error::{RagentError, Result};
use crate::openai::{create_client_with_config, create_compatible_client, ollama_api_base};
use async_openai::config::OpenAIConfig;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RagentError::Embedding("Empty embedding response".to_string()))
    }

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}

/// Supported embedding backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProviderKind {
    Gemini,
    OpenAi,
    Ollama,
}

impl std::str::FromStr for EmbeddingProviderKind {
    type Err = RagentError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(EmbeddingProviderKind::Gemini),
            "openai" => Ok(EmbeddingProviderKind::OpenAi),
            "ollama" => Ok(EmbeddingProviderKind::Ollama),
            other => Err(RagentError::Config(format!(
                "Unknown embedding provider: '{}'. Supported providers: gemini, openai, ollama",
                other
            ))),
        }
    }
}

/// Build the configured embedder.
pub fn create_embedder(
    settings: &EmbeddingSettings,
    llm: &LlmSettings,
) -> Result<Arc<dyn Embedder>> {
    let kind: EmbeddingProviderKind = settings.provider.parse()?;
    let dimensions = settings.dimensions as usize;
    let timeout = Duration::from_secs(llm.timeout_secs);

    let embedder: Arc<dyn Embedder> = match kind {
        EmbeddingProviderKind::Gemini => {
            let api_key = llm.resolved_google_api_key().ok_or_else(|| {
                RagentError::Config(
                    "Gemini embeddings require llm.google_api_key or GOOGLE_API_KEY".to_string(),
                )
            })?;
            let mut embedder =
                GeminiEmbedder::new(&api_key, &settings.model, dimensions, llm.timeout_secs)?;
            if let Some(base) = &settings.api_base {
                embedder = embedder.with_api_base(base);
            }
            Arc::new(embedder)
        }
        EmbeddingProviderKind::OpenAi => {
            let mut config = OpenAIConfig::default();
            if let Some(base) = &settings.api_base {
                config = config.with_api_base(base.trim_end_matches('/'));
            }
            let client = create_client_with_config(config, timeout)?;
            Arc::new(OpenAIEmbedder::with_client(client, &settings.model, dimensions))
        }
        EmbeddingProviderKind::Ollama => {
            let base = settings
                .api_base
                .clone()
                .unwrap_or_else(|| ollama_api_base(&llm.ollama_base_url));
            let client = create_compatible_client(&base, timeout)?;
            Arc::new(
                OpenAIEmbedder::with_client(client, &settings.model, dimensions)
                    .without_dimensions_param(),
            )
        }
    };

    Ok(embedder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_provider_kind_parsing() {
        assert_eq!(
            "Gemini".parse::<EmbeddingProviderKind>().unwrap(),
            EmbeddingProviderKind::Gemini
        );
        assert_eq!(
            "openai".parse::<EmbeddingProviderKind>().unwrap(),
            EmbeddingProviderKind::OpenAi
        );
        assert!(matches!(
            "cohere".parse::<EmbeddingProviderKind>(),
            Err(RagentError::Config(_))
        ));
    }

    #[test]
    fn test_create_ollama_embedder() {
        let settings = EmbeddingSettings {
            provider: "ollama".to_string(),
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
            api_base: None,
        };
        let embedder = create_embedder(&settings, &LlmSettings::default()).unwrap();
        assert_eq!(embedder.dimensions(), 768);
    }
}
