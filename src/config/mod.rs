//! Configuration module for Ragent.
//!
//! Settings are loaded once at startup and handed to each component by reference.

mod settings;

pub use settings::{
    AgentSettings, ChunkingSettings, EmbeddingSettings, GeneralSettings, IngestionSettings,
    LlmSettings, RetrievalSettings, Settings, VectorStoreSettings,
};
