//! OpenAI-compatible client construction.
//!
//! Used for the Ollama chat provider and for OpenAI/Ollama embeddings.
//! `OpenAIConfig::default()` reads the key from `OPENAI_API_KEY`.

use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a client for an OpenAI-compatible server at `api_base`.
///
/// Local servers such as Ollama ignore the key but the header must be present.
pub fn create_compatible_client(api_base: &str, timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_else(|_| "ollama".to_string());
    let config = OpenAIConfig::new()
        .with_api_base(api_base.trim_end_matches('/'))
        .with_api_key(api_key);
    create_client_with_config(config, timeout)
}

/// Create a client with a custom configuration and timeout.
pub fn create_client_with_config(
    config: OpenAIConfig,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Client::with_config(config).with_http_client(http_client))
}

/// OpenAI-compatible base URL for an Ollama server.
pub fn ollama_api_base(base_url: &str) -> String {
    format!("{}/v1", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_api_base() {
        assert_eq!(ollama_api_base("http://localhost:11434"), "http://localhost:11434/v1");
        assert_eq!(ollama_api_base("http://host:11434/"), "http://host:11434/v1");
    }
}
