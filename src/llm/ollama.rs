//! Ollama provider through its OpenAI-compatible `/v1` endpoint.

use super::{
    FunctionCall, GenerationOptions, LlmProvider, LlmResponse, Message, Role, ToolArgs,
    ToolDefinition,
};
use crate::error::{RagentError, Result};
use crate::openai::{create_compatible_client, ollama_api_base};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionObject,
};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// LLM provider for a local Ollama server.
pub struct OllamaProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self> {
        let client = create_compatible_client(
            &ollama_api_base(base_url),
            Duration::from_secs(timeout_secs),
        )?;

        Ok(Self {
            client,
            model: model.to_string(),
        })
    }
}

fn builder_error(e: impl std::fmt::Display) -> RagentError {
    RagentError::Provider(format!("Ollama request error: {}", e))
}

/// Id for the `index`-th call of the assistant message at `message_index`.
fn call_id(message_index: usize, index: usize) -> String {
    format!("call_{}_{}", message_index, index)
}

/// Convert the conversation into chat-completion messages.
///
/// Tool results carry no ids of their own, so each one is matched in order
/// to the calls of the closest preceding assistant message.
fn to_chat_messages(
    messages: &[Message],
    system_instruction: Option<&str>,
) -> Result<Vec<ChatCompletionRequestMessage>> {
    let mut out: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(messages.len() + 1);

    if let Some(system) = system_instruction {
        out.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system.to_string())
                .build()
                .map_err(builder_error)?
                .into(),
        );
    }

    let mut pending_ids: Vec<String> = Vec::new();

    for (msg_idx, msg) in messages.iter().enumerate() {
        match msg.role {
            Role::User => {
                out.push(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(msg.text.clone().unwrap_or_default())
                        .build()
                        .map_err(builder_error)?
                        .into(),
                );
            }
            Role::Assistant => {
                let mut builder = ChatCompletionRequestAssistantMessageArgs::default();
                if let Some(text) = msg.text.as_ref().filter(|t| !t.is_empty()) {
                    builder.content(text.clone());
                }

                pending_ids.clear();
                if !msg.function_calls.is_empty() {
                    let calls: Vec<ChatCompletionMessageToolCall> = msg
                        .function_calls
                        .iter()
                        .enumerate()
                        .map(|(i, fc)| {
                            let id = call_id(msg_idx, i);
                            pending_ids.push(id.clone());
                            ChatCompletionMessageToolCall {
                                id,
                                r#type: ChatCompletionToolType::Function,
                                function: async_openai::types::FunctionCall {
                                    name: fc.name.clone(),
                                    arguments: serde_json::Value::Object(fc.args.clone())
                                        .to_string(),
                                },
                            }
                        })
                        .collect();
                    builder.tool_calls(calls);
                }

                out.push(builder.build().map_err(builder_error)?.into());
            }
            Role::Tool => {
                for (i, result) in msg.function_results.iter().enumerate() {
                    let id = pending_ids
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| call_id(msg_idx, i));
                    out.push(
                        ChatCompletionRequestToolMessageArgs::default()
                            .tool_call_id(id)
                            .content(result.response.to_value().to_string())
                            .build()
                            .map_err(builder_error)?
                            .into(),
                    );
                }
            }
        }
    }

    Ok(out)
}

fn to_chat_tools(tools: &[ToolDefinition]) -> Vec<ChatCompletionTool> {
    tools
        .iter()
        .map(|tool| ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                parameters: Some(tool.parameters_schema(true)),
                strict: None,
            },
        })
        .collect()
}

/// Parse the model's argument string, tolerating malformed JSON.
fn parse_arguments(arguments: &str) -> ToolArgs {
    match serde_json::from_str::<serde_json::Value>(arguments) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => ToolArgs::new(),
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    #[allow(deprecated)]
    #[instrument(skip(self, messages, tools, options), fields(model = %self.model, messages = messages.len()))]
    async fn generate(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        options: &GenerationOptions,
    ) -> Result<LlmResponse> {
        let chat_messages = to_chat_messages(messages, options.system_instruction.as_deref())?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(chat_messages)
            .temperature(options.temperature)
            .max_tokens(options.max_tokens);
        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            builder.tools(to_chat_tools(tools));
        }
        let request = builder.build().map_err(builder_error)?;

        debug!("Calling Ollama chat completion");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| RagentError::Provider(format!("Ollama API Error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RagentError::Provider("Ollama API Error: no choices returned".to_string()))?;

        let function_calls: Vec<FunctionCall> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| FunctionCall::new(call.function.name, parse_arguments(&call.function.arguments)))
            .collect();

        if function_calls.is_empty() {
            Ok(LlmResponse::text(choice.message.content.unwrap_or_default()))
        } else {
            Ok(LlmResponse::calls(function_calls))
        }
    }
}
