//! Provider-agnostic conversation types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Keyword arguments passed to a tool.
pub type ToolArgs = Map<String, Value>;

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// A function call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: ToolArgs,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: ToolArgs) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Outcome of one tool invocation, as shown to the model.
///
/// Serializes to `{"result": "..."}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionResponse {
    Result(String),
    Error(String),
}

impl FunctionResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, FunctionResponse::Error(_))
    }

    /// The text carried by either variant.
    pub fn text(&self) -> &str {
        match self {
            FunctionResponse::Result(s) | FunctionResponse::Error(s) => s,
        }
    }

    /// JSON object form used by provider wire formats.
    pub fn to_value(&self) -> Value {
        match self {
            FunctionResponse::Result(s) => serde_json::json!({ "result": s }),
            FunctionResponse::Error(s) => serde_json::json!({ "error": s }),
        }
    }
}

/// The result of executing a function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResult {
    pub name: String,
    pub response: FunctionResponse,
}

impl FunctionResult {
    pub fn success(name: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: FunctionResponse::Result(result.into()),
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: FunctionResponse::Error(error.into()),
        }
    }
}

/// Provider-agnostic conversation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub function_calls: Vec<FunctionCall>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub function_results: Vec<FunctionResult>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: Some(text.into()),
            function_calls: Vec::new(),
            function_results: Vec::new(),
        }
    }

    pub fn assistant(text: Option<String>, function_calls: Vec<FunctionCall>) -> Self {
        Self {
            role: Role::Assistant,
            text,
            function_calls,
            function_results: Vec::new(),
        }
    }

    pub fn tool_results(function_results: Vec<FunctionResult>) -> Self {
        Self {
            role: Role::Tool,
            text: None,
            function_calls: Vec::new(),
            function_results,
        }
    }
}

/// Response from an LLM generation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmResponse {
    pub text: Option<String>,
    pub function_calls: Vec<FunctionCall>,
}

impl LlmResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            function_calls: Vec::new(),
        }
    }

    pub fn calls(function_calls: Vec<FunctionCall>) -> Self {
        Self {
            text: None,
            function_calls,
        }
    }

    pub fn has_function_calls(&self) -> bool {
        !self.function_calls.is_empty()
    }
}

/// Schema of a single tool parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Primitive type name, e.g. `STRING` or `NUMBER`.
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl ParameterSpec {
    pub fn new(kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
        }
    }
}

/// Parameter name to schema.
pub type ToolParameters = BTreeMap<String, ParameterSpec>;

/// Provider-agnostic tool definition for function calling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ToolParameters>,
}

impl ToolDefinition {
    /// JSON schema object for the parameters, with every parameter required.
    ///
    /// `lowercase_types` converts `STRING` style names to `string` for
    /// OpenAI-compatible servers.
    pub fn parameters_schema(&self, lowercase_types: bool) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        if let Some(params) = &self.parameters {
            for (name, spec) in params {
                let kind = if lowercase_types {
                    spec.kind.to_lowercase()
                } else {
                    spec.kind.clone()
                };
                properties.insert(
                    name.clone(),
                    serde_json::json!({ "type": kind, "description": spec.description }),
                );
                required.push(Value::String(name.clone()));
            }
        }

        let object_type = if lowercase_types { "object" } else { "OBJECT" };
        serde_json::json!({
            "type": object_type,
            "properties": properties,
            "required": required,
        })
    }
}

/// Pass-through generation parameters for one provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub system_instruction: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            system_instruction: None,
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}
