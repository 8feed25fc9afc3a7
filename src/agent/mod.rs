//! Agent system for answering requests with tool calling.
//!
//! The agent alternates between the LLM provider and the tool registry until
//! the model replies with plain text or the iteration budget runs out.

mod runner;

pub use runner::{
    Agent, AgentResponse, ToolCallRecord, DEFAULT_EXHAUSTION_MESSAGE, DEFAULT_MAX_ITERATIONS,
    DEFAULT_SYSTEM_INSTRUCTION,
};
