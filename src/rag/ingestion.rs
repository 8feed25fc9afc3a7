//! Document ingestion: parse, chunk, embed, store.

use super::chunker::chunk_text;
use super::parsers::{fetch_and_parse_url, parse_document};
use crate::config::ChunkingSettings;
use crate::embedding::Embedder;
use crate::error::{RagentError, Result};
use crate::vector_store::{ChunkRecord, VectorStore};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Terminal state of a successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    Completed,
}

/// Outcome of ingesting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResult {
    pub document_id: String,
    pub filename: String,
    pub chunk_count: usize,
    pub status: IngestStatus,
}

/// Runs the ingestion pipeline against one embedder and vector store.
pub struct IngestionService {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    chunk_size: usize,
    chunk_overlap: usize,
    http: reqwest::Client,
}

impl IngestionService {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        chunking: &ChunkingSettings,
    ) -> Self {
        Self {
            embedder,
            store,
            chunk_size: chunking.chunk_size,
            chunk_overlap: chunking.chunk_overlap,
            http: reqwest::Client::new(),
        }
    }

    /// Ingest raw document bytes under a fresh document id.
    ///
    /// Nothing is written to the vector store unless every step before the
    /// final batch upsert succeeds.
    #[instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn ingest(
        &self,
        content: &[u8],
        filename: &str,
        content_type: Option<&str>,
    ) -> Result<IngestResult> {
        let text = parse_document(content, filename, content_type)?;
        self.ingest_text(&text, filename).await
    }

    /// Read and ingest a local file.
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestResult> {
        let content = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.ingest(&content, &filename, None).await
    }

    /// Fetch a web page and ingest its visible text, using the URL as filename.
    #[instrument(skip(self))]
    pub async fn ingest_url(&self, url: &str) -> Result<IngestResult> {
        let text = fetch_and_parse_url(&self.http, url).await?;
        self.ingest_text(&text, url).await
    }

    async fn ingest_text(&self, text: &str, filename: &str) -> Result<IngestResult> {
        let document_id = Uuid::new_v4().to_string();
        info!("Starting ingestion for '{}' (id: {})", filename, document_id);

        if text.trim().is_empty() {
            return Err(RagentError::EmptyContent(filename.to_string()));
        }

        let chunks = chunk_text(text, self.chunk_size, self.chunk_overlap);
        if chunks.is_empty() {
            return Err(RagentError::NoChunks(filename.to_string()));
        }
        info!("Generated {} chunks from '{}'", chunks.len(), filename);

        let embeddings = self.embedder.embed_batch(&chunks).await?;
        if embeddings.len() != chunks.len() {
            return Err(RagentError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }
        debug!("Embedded {} chunks", embeddings.len());

        let records: Vec<ChunkRecord> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(index, (text, embedding))| {
                ChunkRecord::new(&document_id, filename, text, index, embedding)
            })
            .collect();

        let chunk_count = self.store.upsert_batch(&records).await?;

        Ok(IngestResult {
            document_id,
            filename: filename.to_string(),
            chunk_count,
            status: IngestStatus::Completed,
        })
    }

    /// Remove every chunk of a document. Deleting an unknown id is a no-op.
    pub async fn delete(&self, document_id: &str) -> Result<usize> {
        let removed = self.store.delete_by_document(document_id).await?;
        info!("Deleted document {} ({} chunks)", document_id, removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::Retriever;
    use crate::test_support::{KeywordEmbedder, ShortEmbedder};
    use crate::vector_store::MemoryVectorStore;

    fn service(store: Arc<MemoryVectorStore>) -> IngestionService {
        IngestionService::new(
            Arc::new(KeywordEmbedder::new()),
            store,
            &ChunkingSettings {
                chunk_size: 60,
                chunk_overlap: 10,
            },
        )
    }

    #[tokio::test]
    async fn test_ingest_stores_every_chunk() {
        let store = Arc::new(MemoryVectorStore::new());
        let service = service(store.clone());

        let text = "Rust has ownership.\n\nTokio runs async tasks.\n\nSQLite stores rows on disk.";
        let result = service
            .ingest(text.as_bytes(), "notes.md", None)
            .await
            .unwrap();

        assert_eq!(result.status, IngestStatus::Completed);
        assert_eq!(result.filename, "notes.md");
        assert!(result.chunk_count > 1);
        assert_eq!(store.document_count().await.unwrap(), result.chunk_count);

        let documents = store.list_documents().await.unwrap();
        assert_eq!(documents[0].document_id, result.document_id);
    }

    #[tokio::test]
    async fn test_blank_content_is_rejected_without_writes() {
        let store = Arc::new(MemoryVectorStore::new());
        let service = service(store.clone());

        let err = service
            .ingest(b"   \n\n  ", "empty.txt", Some("text/plain"))
            .await
            .unwrap_err();

        assert!(matches!(err, RagentError::EmptyContent(ref name) if name == "empty.txt"));
        assert_eq!(store.document_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_embedding_count_mismatch_writes_nothing() {
        let store = Arc::new(MemoryVectorStore::new());
        let service = IngestionService::new(
            Arc::new(ShortEmbedder),
            store.clone(),
            &ChunkingSettings {
                chunk_size: 60,
                chunk_overlap: 10,
            },
        );

        let text = "Rust has ownership.\n\nTokio runs async tasks.\n\nSQLite stores rows on disk.";
        let err = service
            .ingest(text.as_bytes(), "notes.md", None)
            .await
            .unwrap_err();

        assert!(matches!(err, RagentError::Embedding(ref msg) if msg.starts_with("Expected")));
        assert_eq!(store.document_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_leaves_other_documents_searchable() {
        let store = Arc::new(MemoryVectorStore::new());
        let embedder = Arc::new(KeywordEmbedder::new());
        let service = IngestionService::new(embedder.clone(), store.clone(), &ChunkingSettings::default());

        let d1 = service
            .ingest(b"penguins live in antarctica", "d1.txt", None)
            .await
            .unwrap();
        let d2 = service
            .ingest(b"camels live in deserts", "d2.txt", None)
            .await
            .unwrap();

        assert_eq!(service.delete(&d1.document_id).await.unwrap(), 1);
        assert_eq!(service.delete(&d1.document_id).await.unwrap(), 0);

        let retriever = Retriever::new(store, embedder);
        let hits = retriever.search_with_scores("where do penguins live").await.unwrap();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|h| h.document_id == d2.document_id));
    }

    #[test]
    fn test_ingest_result_serializes_status() {
        let result = IngestResult {
            document_id: "abc".into(),
            filename: "a.txt".into(),
            chunk_count: 2,
            status: IngestStatus::Completed,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["chunk_count"], 2);
    }

    #[tokio::test]
    async fn test_ingest_file_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readme.txt");
        std::fs::write(&path, "A small file about crates.").unwrap();

        let store = Arc::new(MemoryVectorStore::new());
        let result = service(store).ingest_file(&path).await.unwrap();
        assert_eq!(result.filename, "readme.txt");
        assert_eq!(result.chunk_count, 1);
    }
}
