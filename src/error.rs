//! Error types for Ragent.

use thiserror::Error;

/// Library-level error type for Ragent operations.
#[derive(Error, Debug)]
pub enum RagentError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tool '{0}' not found in registry")]
    ToolNotFound(String),

    #[error("Tool execution failed: {0}")]
    ToolExecution(String),

    #[error("LLM provider error: {0}")]
    Provider(String),

    #[error("Unknown LLM provider: '{0}'. Supported providers: gemini, ollama, mock")]
    UnsupportedProvider(String),

    #[error("No text content extracted from '{0}'")]
    EmptyContent(String),

    #[error("No chunks generated from '{0}'")]
    NoChunks(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Document parsing failed: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Ragent operations.
pub type Result<T> = std::result::Result<T, RagentError>;
