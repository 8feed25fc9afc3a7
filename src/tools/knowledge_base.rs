//! Knowledge-base search exposed as a tool.

use super::Tool;
use crate::error::Result;
use crate::llm::{ParameterSpec, ToolArgs, ToolParameters};
use crate::rag::Retriever;
use async_trait::async_trait;
use std::sync::Arc;

const NAME: &str = "search_knowledge_base";

const DESCRIPTION: &str = "Search the knowledge base for relevant information about a topic. \
Use this when you need to look up specific facts, details, or context from ingested documents.";

/// Searches ingested documents through a [`Retriever`].
pub struct KnowledgeBaseTool {
    retriever: Arc<Retriever>,
}

impl KnowledgeBaseTool {
    pub fn new(retriever: Arc<Retriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Tool for KnowledgeBaseTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn parameters(&self) -> ToolParameters {
        let mut params = ToolParameters::new();
        params.insert(
            "query".to_string(),
            ParameterSpec::new("STRING", "The search query to find relevant documents"),
        );
        params
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .unwrap_or_default();
        if query.is_empty() {
            return Ok("Error: No search query provided.".to_string());
        }

        let results = self.retriever.search(query).await?;
        if results.is_empty() {
            return Ok("No relevant information found in the knowledge base.".to_string());
        }

        let formatted = results
            .iter()
            .enumerate()
            .map(|(i, text)| format!("[Result {}]\n{}", i + 1, text))
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");

        Ok(format!(
            "Found {} relevant results:\n\n{}",
            results.len(),
            formatted
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::KeywordEmbedder;
    use crate::vector_store::{ChunkRecord, MemoryVectorStore, VectorStore};

    fn query(q: &str) -> ToolArgs {
        let mut args = ToolArgs::new();
        args.insert("query".into(), serde_json::json!(q));
        args
    }

    #[tokio::test]
    async fn test_missing_query() {
        let retriever = Retriever::new(
            Arc::new(MemoryVectorStore::new()),
            Arc::new(KeywordEmbedder::new()),
        );
        let tool = KnowledgeBaseTool::new(Arc::new(retriever));

        assert_eq!(
            tool.execute(&ToolArgs::new()).await.unwrap(),
            "Error: No search query provided."
        );
        assert_eq!(
            tool.execute(&query("   ")).await.unwrap(),
            "Error: No search query provided."
        );
    }

    #[tokio::test]
    async fn test_empty_knowledge_base() {
        let retriever = Retriever::new(
            Arc::new(MemoryVectorStore::new()),
            Arc::new(KeywordEmbedder::new()),
        );
        let tool = KnowledgeBaseTool::new(Arc::new(retriever));

        assert_eq!(
            tool.execute(&query("rust")).await.unwrap(),
            "No relevant information found in the knowledge base."
        );
    }

    #[tokio::test]
    async fn test_formats_numbered_results() {
        let embedder = KeywordEmbedder::new();
        let store = Arc::new(MemoryVectorStore::new());
        store
            .upsert_batch(&[
                ChunkRecord::new("d", "a.txt", "rust is fast".into(), 0, embedder.vector("rust is fast")),
                ChunkRecord::new("d", "a.txt", "rust is safe".into(), 1, embedder.vector("rust is safe")),
            ])
            .await
            .unwrap();

        let retriever = Retriever::new(store, Arc::new(embedder)).with_top_k(2);
        let tool = KnowledgeBaseTool::new(Arc::new(retriever));

        let output = tool.execute(&query("is rust fast")).await.unwrap();
        assert_eq!(
            output,
            "Found 2 relevant results:\n\n[Result 1]\nrust is fast\n\n---\n\n[Result 2]\nrust is safe"
        );
    }

    #[test]
    fn test_definition() {
        let retriever = Retriever::new(
            Arc::new(MemoryVectorStore::new()),
            Arc::new(KeywordEmbedder::new()),
        );
        let def = KnowledgeBaseTool::new(Arc::new(retriever)).definition();
        assert_eq!(def.name, "search_knowledge_base");
        assert_eq!(def.parameters.unwrap()["query"].kind, "STRING");
    }
}
