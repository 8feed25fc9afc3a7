//! Ragent - retrieval-augmented LLM agent
//!
//! A worker that answers natural-language requests with an LLM, optionally
//! consulting a private document corpus through a tool-calling loop.
//!
//! # Overview
//!
//! Ragent allows you to:
//! - Ingest PDF, HTML, Markdown and text documents (or web pages) into a vector index
//! - Search that index semantically
//! - Ask an agent that decides when to search the knowledge base before answering
//! - Switch between Gemini, Ollama and an offline mock provider per request
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `llm` - LLM provider abstraction (Gemini, Ollama, mock)
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction
//! - `rag` - Chunking, parsing, ingestion and retrieval
//! - `tools` - Tool trait, registry and the knowledge-base tool
//! - `agent` - The tool-calling loop
//! - `worker` - Component wiring and chat processing
//!
//! # Example
//!
//! ```rust,no_run
//! use ragent::config::Settings;
//! use ragent::worker::{ChatTask, Worker};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let worker = Worker::new(settings)?;
//!
//!     worker.ingest_file("handbook.pdf".as_ref()).await?;
//!     let reply = worker
//!         .process_chat(&ChatTask::new("chat-1", "What does the handbook say about leave?"))
//!         .await?;
//!     println!("{}", reply.response);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod openai;
pub mod rag;
pub mod tools;
pub mod vector_store;
pub mod worker;

#[cfg(test)]
mod test_support;

pub use error::{RagentError, Result};
