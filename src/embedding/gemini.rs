//! Gemini embeddings via the REST `batchEmbedContents` endpoint.

use super::Embedder;
use crate::error::{RagentError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini accepts at most 100 requests per batch call.
const BATCH_SIZE: usize = 100;

/// Gemini-based embedder.
pub struct GeminiEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
    api_base: String,
}

impl GeminiEmbedder {
    pub fn new(api_key: &str, model: &str, dimensions: usize, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.trim_start_matches("models/").to_string(),
            dimensions,
            api_base: API_BASE.to_string(),
        })
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn build_request_body(&self, texts: &[String]) -> Value {
        let requests: Vec<Value> = texts
            .iter()
            .map(|text| {
                json!({
                    "model": format!("models/{}", self.model),
                    "content": { "parts": [{ "text": text }] },
                    "outputDimensionality": self.dimensions,
                })
            })
            .collect();
        json!({ "requests": requests })
    }
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    #[instrument(skip(self, texts), fields(count = texts.len(), model = %self.model))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/models/{}:batchEmbedContents", self.api_base, self.model);
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let response = self
                .client
                .post(&url)
                .query(&[("key", &self.api_key)])
                .json(&self.build_request_body(chunk))
                .send()
                .await
                .map_err(|e| RagentError::Embedding(format!("Gemini embedding error: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(RagentError::Embedding(format!(
                    "Gemini embedding error (HTTP {}): {}",
                    status.as_u16(),
                    body
                )));
            }

            let parsed: BatchEmbedResponse = response
                .json()
                .await
                .map_err(|e| RagentError::Embedding(format!("Invalid embedding response: {}", e)))?;

            if parsed.embeddings.len() != chunk.len() {
                return Err(RagentError::Embedding(format!(
                    "Expected {} embeddings, got {}",
                    chunk.len(),
                    parsed.embeddings.len()
                )));
            }

            all_embeddings.extend(parsed.embeddings.into_iter().map(|e| e.values));
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

    #[test]
    fn test_request_body() {
        let embedder = GeminiEmbedder::new("key", "models/gemini-embedding-001", 768, 30).unwrap();
        let body = embedder.build_request_body(&["one".to_string(), "two".to_string()]);

        assert_eq!(body["requests"].as_array().unwrap().len(), 2);
        assert_eq!(body["requests"][0]["model"], "models/gemini-embedding-001");
        assert_eq!(body["requests"][1]["content"]["parts"][0]["text"], "two");
        assert_eq!(body["requests"][0]["outputDimensionality"], 768);
    }

    #[test]
    fn test_parse_response() {
        let raw = r#"{"embeddings":[{"values":[0.1,0.2]},{"values":[0.3,0.4]}]}"#;
        let parsed: BatchEmbedResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.embeddings[1].values, vec![0.3, 0.4]);
    }
}
