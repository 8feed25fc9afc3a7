//! SQLite-based vector store implementation.
//!
//! Similarity is computed in Rust over every stored row, which is fine for
//! personal-sized corpora.

use super::{cosine_similarity, rank, ChunkRecord, IndexedDocument, SearchHit, VectorStore};
use crate::error::{RagentError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    document_id TEXT NOT NULL,
    filename TEXT NOT NULL,
    text TEXT NOT NULL,
    chunk_index INTEGER NOT NULL,
    embedding BLOB NOT NULL,
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chunks_document_id ON chunks(document_id);
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Open (or create) a store at `path`.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RagentError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn parse_timestamp(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ChunkRecord> {
        let id_str: String = row.get(0)?;
        let chunk_index: i64 = row.get(4)?;
        let embedding_bytes: Vec<u8> = row.get(5)?;
        let indexed_at: String = row.get(6)?;

        Ok(ChunkRecord {
            id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
            document_id: row.get(1)?,
            filename: row.get(2)?,
            text: row.get(3)?,
            chunk_index: chunk_index as usize,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            indexed_at: Self::parse_timestamp(&indexed_at),
        })
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upsert_batch(&self, records: &[ChunkRecord]) -> Result<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        for record in records {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO chunks
                (id, document_id, filename, text, chunk_index, embedding, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    record.id.to_string(),
                    record.document_id,
                    record.filename,
                    record.text,
                    record.chunk_index as i64,
                    Self::embedding_to_bytes(&record.embedding),
                    record.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Batch upserted {} chunks", records.len());
        Ok(records.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, document_id, filename, text, chunk_index, embedding, indexed_at
            FROM chunks
            "#,
        )?;

        let hits: Vec<SearchHit> = stmt
            .query_map([], Self::row_to_record)?
            .filter_map(|r| r.ok())
            .map(|record| SearchHit {
                score: cosine_similarity(query_embedding, &record.embedding),
                record,
            })
            .collect();

        let hits = rank(hits, limit);
        debug!("Found {} matching chunks", hits.len());
        Ok(hits)
    }

    #[instrument(skip(self))]
    async fn delete_by_document(&self, document_id: &str) -> Result<usize> {
        let conn = self.lock()?;

        let deleted = conn.execute(
            "DELETE FROM chunks WHERE document_id = ?1",
            params![document_id],
        )?;

        info!("Deleted {} chunks for document {}", deleted, document_id);
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn list_documents(&self) -> Result<Vec<IndexedDocument>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT document_id, MIN(filename), COUNT(*) AS chunk_count, MAX(indexed_at) AS indexed_at
            FROM chunks
            GROUP BY document_id
            ORDER BY indexed_at DESC
            "#,
        )?;

        let documents = stmt.query_map([], |row| {
            let chunk_count: i64 = row.get(2)?;
            let indexed_at: String = row.get(3)?;
            Ok(IndexedDocument {
                document_id: row.get(0)?,
                filename: row.get(1)?,
                chunk_count: chunk_count as usize,
                indexed_at: Self::parse_timestamp(&indexed_at),
            })
        })?;

        Ok(documents.filter_map(|d| d.ok()).collect())
    }

    async fn document_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_vector_store() {
        let store = SqliteVectorStore::in_memory().unwrap();

        let record = ChunkRecord::new(
            "doc1",
            "guide.md",
            "This is test content".to_string(),
            0,
            vec![1.0, 0.0, 0.0],
        );
        store.upsert_batch(&[record]).await.unwrap();

        let documents = store.list_documents().await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].document_id, "doc1");
        assert_eq!(documents[0].filename, "guide.md");

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.0).abs() < 0.001);
        assert_eq!(results[0].record.embedding, vec![1.0, 0.0, 0.0]);

        let deleted = store.delete_by_document("doc1").await.unwrap();
        assert_eq!(deleted, 1);
        assert!(store.list_documents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vectors.db");

        {
            let store = SqliteVectorStore::new(&path).unwrap();
            store
                .upsert_batch(&[
                    ChunkRecord::new("doc1", "a.txt", "one".into(), 0, vec![0.5, 0.5]),
                    ChunkRecord::new("doc1", "a.txt", "two".into(), 1, vec![0.1, 0.9]),
                ])
                .await
                .unwrap();
        }

        let reopened = SqliteVectorStore::new(&path).unwrap();
        assert_eq!(reopened.document_count().await.unwrap(), 2);
        let hits = reopened.search(&[0.0, 1.0], 1).await.unwrap();
        assert_eq!(hits[0].record.text, "two");
        assert_eq!(hits[0].record.chunk_index, 1);
    }
}
