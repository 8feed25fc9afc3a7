//! In-memory vector store implementation.
//!
//! Useful for testing and small datasets.

use super::{cosine_similarity, rank, ChunkRecord, IndexedDocument, SearchHit, VectorStore};
use crate::error::{RagentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory vector store.
pub struct MemoryVectorStore {
    records: RwLock<HashMap<String, ChunkRecord>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, ChunkRecord>>> {
        self.records
            .read()
            .map_err(|e| RagentError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, ChunkRecord>>> {
        self.records
            .write()
            .map_err(|e| RagentError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, records: &[ChunkRecord]) -> Result<usize> {
        let mut store = self.write()?;
        for record in records {
            store.insert(record.id.to_string(), record.clone());
        }
        Ok(records.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
        let store = self.read()?;

        let hits: Vec<SearchHit> = store
            .values()
            .map(|record| SearchHit {
                score: cosine_similarity(query_embedding, &record.embedding),
                record: record.clone(),
            })
            .collect();

        Ok(rank(hits, limit))
    }

    async fn delete_by_document(&self, document_id: &str) -> Result<usize> {
        let mut store = self.write()?;
        let initial_len = store.len();
        store.retain(|_, record| record.document_id != document_id);
        Ok(initial_len - store.len())
    }

    async fn list_documents(&self) -> Result<Vec<IndexedDocument>> {
        let store = self.read()?;

        let mut by_document: HashMap<String, IndexedDocument> = HashMap::new();

        for record in store.values() {
            let entry = by_document
                .entry(record.document_id.clone())
                .or_insert_with(|| IndexedDocument {
                    document_id: record.document_id.clone(),
                    filename: record.filename.clone(),
                    chunk_count: 0,
                    indexed_at: record.indexed_at,
                });

            entry.chunk_count += 1;
            if record.indexed_at > entry.indexed_at {
                entry.indexed_at = record.indexed_at;
            }
        }

        let mut documents: Vec<IndexedDocument> = by_document.into_values().collect();
        documents.sort_by(|a, b| b.indexed_at.cmp(&a.indexed_at));

        Ok(documents)
    }

    async fn document_count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}
