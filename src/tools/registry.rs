//! Name-indexed collection of tools.

use super::Tool;
use crate::error::{RagentError, Result};
use crate::llm::{ToolArgs, ToolDefinition};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Tools in registration order, addressable by name.
///
/// Built once at startup and shared read-only through an `Arc`.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. A tool with the same name is replaced in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        info!("Registering tool: {}", name);

        match self.index.get(&name) {
            Some(&slot) => self.tools[slot] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<&Arc<dyn Tool>> {
        self.index
            .get(name)
            .map(|&slot| &self.tools[slot])
            .ok_or_else(|| RagentError::ToolNotFound(name.to_string()))
    }

    /// Look up a tool by name and run it.
    pub async fn execute(&self, name: &str, args: &ToolArgs) -> Result<String> {
        let tool = self.get(name)?;
        info!(
            "Executing tool '{}' with args: {}",
            name,
            serde_json::Value::Object(args.clone())
        );
        tool.execute(args).await
    }

    pub fn has_tools(&self) -> bool {
        !self.tools.is_empty()
    }

    /// Registered tools in registration order.
    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }
}
