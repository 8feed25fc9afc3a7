//! Retrieval-augmented generation: document ingestion and query-time retrieval.

pub mod chunker;
mod ingestion;
pub mod parsers;
mod retriever;

pub use chunker::chunk_text;
pub use ingestion::{IngestResult, IngestStatus, IngestionService};
pub use parsers::{parse_document, HtmlExtractor};
pub use retriever::{Retriever, SearchResult, DEFAULT_TOP_K};
