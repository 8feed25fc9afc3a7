//! Vector store abstraction for Ragent.
//!
//! Provides a trait-based interface for different vector database backends.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::config::Settings;
use crate::error::{RagentError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// One embedded chunk stored in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Unique chunk ID.
    pub id: Uuid,
    /// Document this chunk belongs to.
    pub document_id: String,
    /// Source filename or URL.
    pub filename: String,
    /// Text content of this chunk.
    pub text: String,
    /// Position of this chunk within the document.
    pub chunk_index: usize,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this chunk was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl ChunkRecord {
    pub fn new(
        document_id: &str,
        filename: &str,
        text: String,
        chunk_index: usize,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id: document_id.to_string(),
            filename: filename.to_string(),
            text,
            chunk_index,
            embedding,
            indexed_at: Utc::now(),
        }
    }
}

/// A stored chunk with its similarity to the query.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub record: ChunkRecord,
    /// Cosine similarity (higher is better).
    pub score: f32,
}

/// Summary information about an indexed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub document_id: String,
    pub filename: String,
    pub chunk_count: usize,
    pub indexed_at: DateTime<Utc>,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store all records in one write.
    async fn upsert_batch(&self, records: &[ChunkRecord]) -> Result<usize>;

    /// Return up to `limit` records ordered by decreasing similarity.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchHit>>;

    /// Remove every record of a document; returns how many were removed.
    async fn delete_by_document(&self, document_id: &str) -> Result<usize>;

    /// List indexed documents, most recent first.
    async fn list_documents(&self) -> Result<Vec<IndexedDocument>>;

    /// Total number of stored chunks.
    async fn document_count(&self) -> Result<usize>;
}

/// Supported vector store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorStoreKind {
    Sqlite,
    Memory,
}

impl std::str::FromStr for VectorStoreKind {
    type Err = RagentError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(VectorStoreKind::Sqlite),
            "memory" => Ok(VectorStoreKind::Memory),
            other => Err(RagentError::Config(format!(
                "Unknown vector store: '{}'. Supported stores: sqlite, memory",
                other
            ))),
        }
    }
}

/// Build the configured vector store.
pub fn create_vector_store(settings: &Settings) -> Result<Arc<dyn VectorStore>> {
    let kind: VectorStoreKind = settings.vector_store.provider.parse()?;
    let store: Arc<dyn VectorStore> = match kind {
        VectorStoreKind::Sqlite => Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?),
        VectorStoreKind::Memory => Arc::new(MemoryVectorStore::new()),
    };
    Ok(store)
}

/// Order hits by decreasing score and keep the first `limit`.
pub(crate) fn rank(mut hits: Vec<SearchHit>, limit: usize) -> Vec<SearchHit> {
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    hits.truncate(limit);
    hits
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
