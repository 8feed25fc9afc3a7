//! Google Gemini provider using the REST `generateContent` endpoint.

use super::{
    FunctionCall, GenerationOptions, LlmProvider, LlmResponse, Message, Role, ToolArgs,
    ToolDefinition,
};
use crate::error::{RagentError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// LLM provider for Google Gemini models.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Convert abstract messages into a `generateContent` request body.
    fn build_request_body(
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        options: &GenerationOptions,
    ) -> Value {
        let contents: Vec<Value> = messages.iter().map(Self::to_content).collect();

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "temperature": options.temperature,
                "maxOutputTokens": options.max_tokens,
            }
        });

        if let Some(system) = &options.system_instruction {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }

        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            let declarations: Vec<Value> = tools
                .iter()
                .map(|tool| {
                    let mut decl = json!({
                        "name": tool.name,
                        "description": tool.description,
                    });
                    if tool.parameters.as_ref().is_some_and(|p| !p.is_empty()) {
                        decl["parameters"] = tool.parameters_schema(false);
                    }
                    decl
                })
                .collect();
            body["tools"] = json!([{ "functionDeclarations": declarations }]);
        }

        body
    }

    fn to_content(msg: &Message) -> Value {
        match msg.role {
            Role::User => json!({
                "role": "user",
                "parts": [{ "text": msg.text.clone().unwrap_or_default() }],
            }),
            Role::Assistant => {
                let mut parts = Vec::new();
                if let Some(text) = msg.text.as_ref().filter(|t| !t.is_empty()) {
                    parts.push(json!({ "text": text }));
                }
                for fc in &msg.function_calls {
                    parts.push(json!({
                        "functionCall": { "name": fc.name, "args": fc.args }
                    }));
                }
                if parts.is_empty() {
                    parts.push(json!({ "text": "" }));
                }
                json!({ "role": "model", "parts": parts })
            }
            Role::Tool => {
                let parts: Vec<Value> = msg
                    .function_results
                    .iter()
                    .map(|fr| {
                        json!({
                            "functionResponse": {
                                "name": fr.name,
                                "response": fr.response.to_value(),
                            }
                        })
                    })
                    .collect();
                json!({ "role": "user", "parts": parts })
            }
        }
    }

    /// Extract text and function calls from the first candidate.
    fn parse_response(response: GenerateContentResponse) -> Result<LlmResponse> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| RagentError::Provider("Gemini API Error: no candidates returned".to_string()))?;

        let mut text = String::new();
        let mut function_calls = Vec::new();

        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(t) = part.text {
                text.push_str(&t);
            }
            if let Some(fc) = part.function_call {
                let args = match fc.args {
                    Some(Value::Object(map)) => map,
                    _ => ToolArgs::new(),
                };
                function_calls.push(FunctionCall::new(fc.name, args));
            }
        }

        let text = if function_calls.is_empty() || !text.is_empty() {
            Some(text)
        } else {
            None
        };

        Ok(LlmResponse {
            text,
            function_calls,
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, messages, tools, options), fields(model = %self.model, messages = messages.len()))]
    async fn generate(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        options: &GenerationOptions,
    ) -> Result<LlmResponse> {
        let body = Self::build_request_body(messages, tools, options);
        let url = format!("{}/models/{}:generateContent", API_BASE, self.model);

        debug!("Calling Gemini generateContent");

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| RagentError::Provider(format!("Gemini API Error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RagentError::Provider(format!(
                "Gemini API Error (HTTP {}): {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RagentError::Provider(format!("Gemini API Error: {}", e)))?;

        Self::parse_response(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Debug, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    args: Option<Value>,
}
