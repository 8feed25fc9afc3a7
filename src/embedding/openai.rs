//! Embeddings through the OpenAI API or any compatible server.

use super::Embedder;
use crate::error::{RagentError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Inputs per embeddings request.
const BATCH_SIZE: usize = 100;

/// OpenAI-compatible embedder.
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: usize,
    send_dimensions: bool,
}

impl OpenAIEmbedder {
    /// Create an embedder over an existing client.
    pub fn with_client(client: Client<OpenAIConfig>, model: &str, dimensions: usize) -> Self {
        Self {
            client,
            model: model.to_string(),
            dimensions,
            send_dimensions: true,
        }
    }

    /// Do not send `dimensions`; for servers whose models have a fixed size.
    pub fn without_dimensions_param(mut self) -> Self {
        self.send_dimensions = false;
        self
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, texts), fields(count = texts.len(), model = %self.model))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let mut builder = CreateEmbeddingRequestArgs::default();
            builder
                .model(&self.model)
                .input(EmbeddingInput::StringArray(chunk.to_vec()));
            if self.send_dimensions {
                builder.dimensions(self.dimensions as u32);
            }
            let request = builder
                .build()
                .map_err(|e| RagentError::Embedding(format!("Failed to build request: {}", e)))?;

            let response = self
                .client
                .embeddings()
                .create(request)
                .await
                .map_err(|e| RagentError::Embedding(format!("Embedding API error: {}", e)))?;

            // Sort by index to ensure correct order
            let mut embeddings = response.data;
            embeddings.sort_by_key(|e| e.index);

            all_embeddings.extend(embeddings.into_iter().map(|e| e.embedding));
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::create_compatible_client;
    use std::time::Duration;

    #[tokio::test]
    async fn test_empty_batch_skips_request() {
        let client = create_compatible_client("http://127.0.0.1:9/v1", Duration::from_secs(1)).unwrap();
        let embedder = OpenAIEmbedder::with_client(client, "text-embedding-3-small", 1536);
        assert_eq!(embedder.dimensions(), 1536);
        assert!(embedder.embed_batch(&[]).await.unwrap().is_empty());
    }
}
