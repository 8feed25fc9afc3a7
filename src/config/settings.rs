//! Configuration settings for Ragent.

use crate::error::{RagentError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub embedding: EmbeddingSettings,
    pub chunking: ChunkingSettings,
    pub retrieval: RetrievalSettings,
    pub vector_store: VectorStoreSettings,
    pub agent: AgentSettings,
    pub ingestion: IngestionSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.ragent".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// LLM provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Provider name (gemini, ollama, mock).
    pub provider: String,
    /// Model used for generation.
    pub model: String,
    /// Maximum output tokens per generation call.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Google API key. Falls back to the GOOGLE_API_KEY environment variable.
    pub google_api_key: Option<String>,
    /// Base URL of the Ollama server.
    pub ollama_base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash-lite".to_string(),
            max_output_tokens: 1024,
            temperature: 0.7,
            google_api_key: None,
            ollama_base_url: "http://localhost:11434".to_string(),
            timeout_secs: 300,
        }
    }
}

impl LlmSettings {
    /// Resolve the Google API key from settings or the environment.
    pub fn resolved_google_api_key(&self) -> Option<String> {
        self.google_api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty()))
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider (gemini, openai, ollama).
    pub provider: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
    /// Override for the OpenAI-compatible API base URL.
    pub api_base: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-embedding-001".to_string(),
            dimensions: 768,
            api_base: None,
        }
    }
}

/// Text chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between adjacent chunks in characters.
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of chunks returned per query.
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Vector store provider (sqlite, memory).
    pub provider: String,
    /// Path to SQLite database (for sqlite provider).
    pub sqlite_path: String,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: "sqlite".to_string(),
            sqlite_path: "~/.ragent/vectors.db".to_string(),
        }
    }
}

/// Agent loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Maximum number of generate calls per run.
    pub max_iterations: usize,
    /// System instruction used when the caller does not supply one.
    pub system_instruction: Option<String>,
    /// Reply returned when the iteration budget runs out.
    pub exhaustion_message: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_iterations: crate::agent::DEFAULT_MAX_ITERATIONS,
            system_instruction: None,
            exhaustion_message: crate::agent::DEFAULT_EXHAUSTION_MESSAGE.to_string(),
        }
    }
}

/// Ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionSettings {
    /// Maximum number of files ingested concurrently by the CLI.
    pub max_concurrent: usize,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Check that the configuration is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(RagentError::Config(
                "chunking.chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(RagentError::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.agent.max_iterations == 0 {
            return Err(RagentError::Config(
                "agent.max_iterations must be at least 1".to_string(),
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(RagentError::Config(
                "retrieval.top_k must be at least 1".to_string(),
            ));
        }

        self.llm.provider.parse::<crate::llm::ProviderKind>()?;
        self.embedding
            .provider
            .parse::<crate::embedding::EmbeddingProviderKind>()?;
        self.vector_store
            .provider
            .parse::<crate::vector_store::VectorStoreKind>()?;

        Ok(())
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| RagentError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ragent")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded SQLite database path.
    pub fn sqlite_path(&self) -> PathBuf {
        Self::expand_path(&self.vector_store.sqlite_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.agent.max_iterations, 3);
        assert_eq!(settings.retrieval.top_k, 5);
        assert_eq!(settings.chunking.chunk_size, 1000);
        assert_eq!(settings.chunking.chunk_overlap, 200);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [llm]
            provider = "ollama"
            model = "llama3.1"

            [chunking]
            chunk_size = 500
            "#,
        )
        .unwrap();

        assert_eq!(settings.llm.provider, "ollama");
        assert_eq!(settings.llm.max_output_tokens, 1024);
        assert_eq!(settings.chunking.chunk_size, 500);
        assert_eq!(settings.chunking.chunk_overlap, 200);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let mut settings = Settings::default();
        settings.chunking.chunk_overlap = settings.chunking.chunk_size;
        assert!(matches!(settings.validate(), Err(RagentError::Config(_))));
    }

    #[test]
    fn test_unknown_provider_fails_validation() {
        let mut settings = Settings::default();
        settings.llm.provider = "claude".to_string();
        assert!(matches!(
            settings.validate(),
            Err(RagentError::UnsupportedProvider(name)) if name == "claude"
        ));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.retrieval.top_k = 8;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.retrieval.top_k, 8);
    }
}
