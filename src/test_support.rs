//! Deterministic fakes shared by unit tests.

use crate::embedding::Embedder;
use crate::error::{RagentError, Result};
use crate::llm::{
    GenerationOptions, LlmProvider, LlmResponse, Message, ParameterSpec, ToolArgs,
    ToolDefinition, ToolParameters,
};
use crate::tools::Tool;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const DIMENSIONS: usize = 256;

/// Bag-of-words embedder: each lowercase word increments one hashed bucket.
pub struct KeywordEmbedder;

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self
    }

    pub fn vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; DIMENSIONS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            vector[bucket(&word.to_lowercase())] += 1.0;
        }
        vector
    }
}

/// FNV-1a, so buckets are stable across runs.
fn bucket(word: &str) -> usize {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in word.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    (hash % DIMENSIONS as u64) as usize
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }
}

/// Returns one vector fewer than it was asked for.
pub struct ShortEmbedder;

#[async_trait]
impl Embedder for ShortEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(vec![vec![1.0; DIMENSIONS]; texts.len().saturating_sub(1)])
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }
}

/// Replays canned responses and records every request.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<LlmResponse>>>,
    repeat: Option<LlmResponse>,
    calls: AtomicUsize,
    requests: Mutex<Vec<Request>>,
}

/// What the provider was asked on one call.
#[derive(Debug, Clone)]
pub struct Request {
    pub messages: Vec<Message>,
    pub tools: Option<Vec<ToolDefinition>>,
    pub options: GenerationOptions,
}

impl ScriptedProvider {
    /// Return `responses` in order, then empty text.
    pub fn new(responses: Vec<LlmResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().map(Ok).collect()),
            repeat: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Return the same response on every call.
    pub fn repeating(response: LlmResponse) -> Self {
        Self {
            repeat: Some(response),
            ..Self::new(Vec::new())
        }
    }

    /// Fail every call with a provider error.
    pub fn failing(message: &str) -> Self {
        let provider = Self::new(Vec::new());
        provider
            .script
            .lock()
            .unwrap()
            .push_back(Err(RagentError::Provider(message.to_string())));
        provider
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        options: &GenerationOptions,
    ) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(Request {
            messages: messages.to_vec(),
            tools: tools.map(<[ToolDefinition]>::to_vec),
            options: options.clone(),
        });

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        Ok(self.repeat.clone().unwrap_or_else(|| LlmResponse::text("")))
    }
}

/// Returns `prefix` followed by its `text` argument.
pub struct EchoTool {
    name: String,
    prefix: String,
}

impl EchoTool {
    pub fn new(name: &str, prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
        }
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Echo the input text"
    }

    fn parameters(&self) -> ToolParameters {
        let mut params = ToolParameters::new();
        params.insert("text".into(), ParameterSpec::new("STRING", "Text to echo"));
        params
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let text = args.get("text").and_then(|v| v.as_str()).unwrap_or_default();
        Ok(format!("{}{}", self.prefix, text))
    }
}

/// Always fails with `tool exploded`.
pub struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "broken"
    }

    fn description(&self) -> &str {
        "A tool that always fails"
    }

    async fn execute(&self, _args: &ToolArgs) -> Result<String> {
        Err(RagentError::ToolExecution("tool exploded".to_string()))
    }
}
