//! Component wiring and request processing.
//!
//! A [`Worker`] owns the shared pieces (embedder, vector store, tool registry)
//! and builds a provider per chat task so each task can pick its own backend.

use crate::agent::{Agent, ToolCallRecord};
use crate::config::Settings;
use crate::embedding::{create_embedder, Embedder};
use crate::error::Result;
use crate::llm::{create_provider, GenerationOptions, LlmProvider, Message, ProviderKind};
use crate::rag::{IngestResult, IngestionService, Retriever, SearchResult};
use crate::tools::{KnowledgeBaseTool, ToolRegistry};
use crate::vector_store::{create_vector_store, IndexedDocument, VectorStore};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// One chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTask {
    pub chat_id: String,
    pub message: String,
    /// Provider name; the configured provider when absent.
    #[serde(default)]
    pub provider: Option<String>,
    /// Model name; the configured model when absent.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub system_instruction: Option<String>,
}

impl ChatTask {
    pub fn new(chat_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            message: message.into(),
            provider: None,
            model: None,
            system_instruction: None,
        }
    }
}

/// Reply to a [`ChatTask`].
#[derive(Debug)]
pub struct ChatReply {
    pub chat_id: String,
    pub response: String,
    /// Tool calls made by the agent; empty for direct generation.
    pub tool_calls: Vec<ToolCallRecord>,
}

/// Long-lived set of components shared across requests.
pub struct Worker {
    settings: Settings,
    store: Arc<dyn VectorStore>,
    ingestion: IngestionService,
    retriever: Arc<Retriever>,
    registry: Arc<ToolRegistry>,
}

impl Worker {
    /// Build every component from configuration.
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let embedder = create_embedder(&settings.embedding, &settings.llm)?;
        let store = create_vector_store(&settings)?;
        Ok(Self::with_components(settings, embedder, store))
    }

    /// Build a worker over an existing embedder and store.
    pub fn with_components(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        let ingestion = IngestionService::new(embedder.clone(), store.clone(), &settings.chunking);
        let retriever = Arc::new(
            Retriever::new(store.clone(), embedder).with_top_k(settings.retrieval.top_k),
        );

        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(KnowledgeBaseTool::new(retriever.clone())));

        Self {
            settings,
            store,
            ingestion,
            retriever,
            registry: Arc::new(registry),
        }
    }

    /// Replace the tool registry.
    pub fn with_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Resolve the provider for a task, honoring its overrides.
    pub fn provider_for(&self, task: &ChatTask) -> Result<Arc<dyn LlmProvider>> {
        let name = task.provider.as_deref().unwrap_or(&self.settings.llm.provider);
        let kind: ProviderKind = name.parse()?;
        create_provider(kind, task.model.as_deref(), &self.settings.llm)
    }

    /// Answer a chat task.
    #[instrument(skip(self, task), fields(chat_id = %task.chat_id))]
    pub async fn process_chat(&self, task: &ChatTask) -> Result<ChatReply> {
        let provider = self.provider_for(task)?;
        info!(
            "Processing chat {} using provider: {}",
            task.chat_id,
            provider.name()
        );

        let result = self.answer(provider, task).await;
        match &result {
            Ok(_) => info!("Successfully generated response for chat {}", task.chat_id),
            Err(e) => error!("Error processing chat {}: {}", task.chat_id, e),
        }
        result
    }

    /// Agent loop when tools are registered, a single generation otherwise.
    async fn answer(&self, provider: Arc<dyn LlmProvider>, task: &ChatTask) -> Result<ChatReply> {
        if self.registry.has_tools() {
            let agent = Agent::new(provider, self.registry.clone())
                .with_settings(&self.settings.agent, &self.settings.llm);
            let response = agent
                .run(&task.message, task.system_instruction.as_deref())
                .await?;
            return Ok(ChatReply {
                chat_id: task.chat_id.clone(),
                response: response.content,
                tool_calls: response.tool_calls,
            });
        }

        let options = GenerationOptions {
            system_instruction: task.system_instruction.clone(),
            temperature: self.settings.llm.temperature,
            max_tokens: self.settings.llm.max_output_tokens,
        };
        let response = provider
            .generate(&[Message::user(task.message.clone())], None, &options)
            .await?;

        Ok(ChatReply {
            chat_id: task.chat_id.clone(),
            response: response.text.unwrap_or_default(),
            tool_calls: Vec::new(),
        })
    }

    pub async fn ingest_bytes(
        &self,
        content: &[u8],
        filename: &str,
        content_type: Option<&str>,
    ) -> Result<IngestResult> {
        self.ingestion.ingest(content, filename, content_type).await
    }

    pub async fn ingest_file(&self, path: &Path) -> Result<IngestResult> {
        self.ingestion.ingest_file(path).await
    }

    pub async fn ingest_url(&self, url: &str) -> Result<IngestResult> {
        self.ingestion.ingest_url(url).await
    }

    /// Remove a document; returns the number of chunks removed.
    pub async fn delete_document(&self, document_id: &str) -> Result<usize> {
        self.ingestion.delete(document_id).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.retriever.search_with_scores(query).await
    }

    pub async fn list_documents(&self) -> Result<Vec<IndexedDocument>> {
        self.store.list_documents().await
    }

    /// Total number of stored chunks.
    pub async fn chunk_count(&self) -> Result<usize> {
        self.store.document_count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::DEFAULT_SYSTEM_INSTRUCTION;
    use crate::error::RagentError;
    use crate::test_support::KeywordEmbedder;
    use crate::vector_store::MemoryVectorStore;

    fn worker() -> Worker {
        let mut settings = Settings::default();
        settings.llm.provider = "mock".to_string();
        Worker::with_components(
            settings,
            Arc::new(KeywordEmbedder::new()),
            Arc::new(MemoryVectorStore::new()),
        )
    }

    #[tokio::test]
    async fn test_chat_uses_agent_when_tools_exist() {
        let worker = worker();
        assert!(worker.registry().has_tools());

        let reply = worker.process_chat(&ChatTask::new("c1", "hello")).await.unwrap();
        assert_eq!(reply.chat_id, "c1");
        assert_eq!(
            reply.response,
            format!("[System: {}] Mock response to: 'hello'", DEFAULT_SYSTEM_INSTRUCTION)
        );
    }

    #[tokio::test]
    async fn test_chat_without_tools_generates_directly() {
        let worker = worker().with_registry(Arc::new(ToolRegistry::new()));

        let reply = worker.process_chat(&ChatTask::new("c2", "hello")).await.unwrap();
        assert_eq!(reply.response, "Mock response to: 'hello'");
        assert!(reply.tool_calls.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_provider_override_fails() {
        let mut task = ChatTask::new("c3", "hello");
        task.provider = Some("Claude".to_string());

        let err = worker().process_chat(&task).await.unwrap_err();
        assert!(matches!(err, RagentError::UnsupportedProvider(ref name) if name == "claude"));
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let err = worker()
            .process_chat(&ChatTask::new("c4", "trigger an error please"))
            .await
            .unwrap_err();
        assert!(matches!(err, RagentError::Provider(_)));
    }

    #[tokio::test]
    async fn test_ingest_search_delete_round() {
        let worker = worker();
        let result = worker
            .ingest_bytes(b"Ferris is the Rust mascot crab.", "ferris.txt", None)
            .await
            .unwrap();

        let hits = worker.search("who is the rust mascot").await.unwrap();
        assert_eq!(hits[0].document_id, result.document_id);
        assert_eq!(worker.list_documents().await.unwrap().len(), 1);

        assert_eq!(worker.delete_document(&result.document_id).await.unwrap(), 1);
        assert_eq!(worker.chunk_count().await.unwrap(), 0);
    }

    #[test]
    fn test_chat_task_deserializes_with_defaults() {
        let task: ChatTask =
            serde_json::from_str(r#"{"chat_id":"abc","message":"hi"}"#).unwrap();
        assert!(task.provider.is_none());
        assert!(task.model.is_none());
        assert!(task.system_instruction.is_none());
    }
}
