//! Callable tools exposed to the agent.

mod knowledge_base;
mod registry;

pub use knowledge_base::KnowledgeBaseTool;
pub use registry::ToolRegistry;

use crate::error::Result;
use crate::llm::{ToolArgs, ToolDefinition, ToolParameters};
use async_trait::async_trait;

/// A named capability the model can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique identifier, used for dispatch.
    fn name(&self) -> &str;

    /// What the tool does, shown to the model.
    fn description(&self) -> &str;

    /// Parameter schema. Tools without parameters keep the default.
    fn parameters(&self) -> ToolParameters {
        ToolParameters::new()
    }

    async fn execute(&self, args: &ToolArgs) -> Result<String>;

    /// Provider-agnostic definition of this tool.
    fn definition(&self) -> ToolDefinition {
        let parameters = self.parameters();
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: (!parameters.is_empty()).then_some(parameters),
        }
    }
}
