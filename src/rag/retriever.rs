//! Query-time retrieval over the vector store.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{SearchHit, VectorStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Default number of results per query.
pub const DEFAULT_TOP_K: usize = 5;

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub text: String,
    pub document_id: String,
    pub filename: String,
    pub score: f32,
    pub chunk_index: usize,
}

impl From<SearchHit> for SearchResult {
    fn from(hit: SearchHit) -> Self {
        Self {
            text: hit.record.text,
            document_id: hit.record.document_id,
            filename: hit.record.filename,
            score: hit.score,
            chunk_index: hit.record.chunk_index,
        }
    }
}

/// Embeds queries and returns the closest stored chunks.
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            store,
            embedder,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Texts of the top-k chunks, best first.
    pub async fn search(&self, query: &str) -> Result<Vec<String>> {
        let results = self.search_with_scores(query).await?;
        Ok(results.into_iter().map(|r| r.text).collect())
    }

    /// Top-k chunks with scores and provenance, best first.
    #[instrument(skip(self))]
    pub async fn search_with_scores(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;
        let hits = self.store.search(&query_embedding, self.top_k).await?;

        if hits.is_empty() {
            info!("No results found for query: {}", query);
        } else {
            info!("Found {} results for query: {}", hits.len(), query);
        }

        Ok(hits.into_iter().map(SearchResult::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RagentError;
    use crate::test_support::{KeywordEmbedder, ShortEmbedder};
    use crate::vector_store::{ChunkRecord, MemoryVectorStore};

    async fn seeded_store(embedder: &KeywordEmbedder) -> Arc<MemoryVectorStore> {
        let store = Arc::new(MemoryVectorStore::new());
        let texts = [
            "the borrow checker enforces ownership",
            "tokio schedules async tasks",
            "sqlite keeps rows in a single file",
        ];
        let records: Vec<ChunkRecord> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                ChunkRecord::new("doc", "facts.txt", text.to_string(), i, embedder.vector(text))
            })
            .collect();
        store.upsert_batch(&records).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_empty_index_returns_nothing() {
        let retriever = Retriever::new(
            Arc::new(MemoryVectorStore::new()),
            Arc::new(KeywordEmbedder::new()),
        );
        assert!(retriever.search("anything").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_best_match_comes_first() {
        let embedder = KeywordEmbedder::new();
        let store = seeded_store(&embedder).await;
        let retriever = Retriever::new(store, Arc::new(embedder)).with_top_k(2);

        let results = retriever.search_with_scores("how does tokio run async tasks").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "tokio schedules async tasks");
        assert_eq!(results[0].chunk_index, 1);
        assert!(results[0].score >= results[1].score);

        let texts = retriever.search("ownership and the borrow checker").await.unwrap();
        assert_eq!(texts[0], "the borrow checker enforces ownership");
    }

    #[tokio::test]
    async fn test_missing_query_embedding_is_an_error() {
        let embedder = KeywordEmbedder::new();
        let store = seeded_store(&embedder).await;
        let retriever = Retriever::new(store, Arc::new(ShortEmbedder));

        let err = retriever.search("ownership").await.unwrap_err();
        assert!(matches!(err, RagentError::Embedding(ref msg) if msg == "Empty embedding response"));
    }
}
