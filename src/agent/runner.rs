//! Agent runner with tool calling loop.

use crate::config::{AgentSettings, LlmSettings};
use crate::error::Result;
use crate::llm::{
    FunctionCall, FunctionResult, GenerationOptions, LlmProvider, Message, ToolDefinition,
};
use crate::tools::ToolRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default number of model calls per run.
pub const DEFAULT_MAX_ITERATIONS: usize = 3;

/// Default system instruction for the agent.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful AI assistant. Use the available tools to look up information \
when the user's question could benefit from specific knowledge from the knowledge base.";

/// Reply used when the iteration budget runs out.
pub const DEFAULT_EXHAUSTION_MESSAGE: &str =
    "I was unable to complete the request within the allowed number of steps.";

/// Agent that alternates between the model and registered tools.
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    registry: Arc<ToolRegistry>,
    max_iterations: usize,
    system_instruction: String,
    exhaustion_message: String,
    temperature: f32,
    max_tokens: u32,
}

impl Agent {
    /// Create a new agent over a provider and a tool registry.
    pub fn new(provider: Arc<dyn LlmProvider>, registry: Arc<ToolRegistry>) -> Self {
        let defaults = GenerationOptions::default();
        Self {
            provider,
            registry,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            exhaustion_message: DEFAULT_EXHAUSTION_MESSAGE.to_string(),
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
        }
    }

    /// Apply the `[agent]` and `[llm]` configuration sections.
    pub fn with_settings(mut self, agent: &AgentSettings, llm: &LlmSettings) -> Self {
        self.max_iterations = agent.max_iterations;
        self.exhaustion_message = agent.exhaustion_message.clone();
        if let Some(instruction) = &agent.system_instruction {
            self.system_instruction = instruction.clone();
        }
        self.temperature = llm.temperature;
        self.max_tokens = llm.max_output_tokens;
        self
    }

    /// Set the system instruction used when a run does not supply one.
    pub fn with_system_instruction(mut self, instruction: &str) -> Self {
        self.system_instruction = instruction.to_string();
        self
    }

    /// Set maximum iterations for the agent loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Run the agent on one user message.
    ///
    /// Tool failures are reported back to the model and never abort the run.
    /// Provider failures are returned as errors.
    pub async fn run(&self, message: &str, system_instruction: Option<&str>) -> Result<AgentResponse> {
        let mut messages = vec![Message::user(message)];
        let tool_defs: Option<Vec<ToolDefinition>> = self
            .registry
            .has_tools()
            .then(|| self.registry.definitions());

        let options = GenerationOptions {
            system_instruction: Some(
                system_instruction
                    .unwrap_or(&self.system_instruction)
                    .to_string(),
            ),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut tool_calls_made = Vec::new();

        for iteration in 1..=self.max_iterations {
            info!("Agent iteration {}", iteration);

            let response = self
                .provider
                .generate(&messages, tool_defs.as_deref(), &options)
                .await?;

            messages.push(Message::assistant(
                response.text.clone(),
                response.function_calls.clone(),
            ));

            if !response.has_function_calls() {
                return Ok(AgentResponse {
                    content: response.text.unwrap_or_default(),
                    tool_calls: tool_calls_made,
                    iterations: iteration,
                    exhausted: false,
                });
            }

            let mut results = Vec::with_capacity(response.function_calls.len());
            for call in &response.function_calls {
                let (result, record) = self.execute_tool_call(call).await;
                results.push(result);
                tool_calls_made.push(record);
            }
            debug!("Appending {} tool results", results.len());
            messages.push(Message::tool_results(results));
        }

        warn!("Agent reached maximum tool iterations ({})", self.max_iterations);
        Ok(AgentResponse {
            content: self.exhaustion_message.clone(),
            tool_calls: tool_calls_made,
            iterations: self.max_iterations,
            exhausted: true,
        })
    }

    /// Execute a single tool call, converting any failure into an error result.
    async fn execute_tool_call(&self, call: &FunctionCall) -> (FunctionResult, ToolCallRecord) {
        let arguments = serde_json::Value::Object(call.args.clone()).to_string();
        info!("Tool call: {}({})", call.name, arguments);

        let result = match self.registry.execute(&call.name, &call.args).await {
            Ok(output) => FunctionResult::success(&call.name, output),
            Err(e) => {
                warn!("Tool '{}' failed: {}", call.name, e);
                FunctionResult::failure(&call.name, e.to_string())
            }
        };

        let record = ToolCallRecord {
            name: call.name.clone(),
            arguments,
            result: result.response.text().to_string(),
            failed: result.response.is_error(),
        };

        (result, record)
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
    /// Whether the run stopped because the iteration budget ran out.
    pub exhausted: bool,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result or error text returned to the model.
    pub result: String,
    /// Whether the tool returned an error instead of a result.
    pub failed: bool,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
