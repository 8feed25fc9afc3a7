//! Offline provider for development and tests.

use super::{GenerationOptions, LlmProvider, LlmResponse, Message, Role, ToolDefinition};
use crate::error::{RagentError, Result};
use async_trait::async_trait;
use std::time::Duration;

const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Echoes the last user message after a short delay.
///
/// A prompt containing "error" produces a provider error.
pub struct MockProvider {
    delay: Duration,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        messages: &[Message],
        _tools: Option<&[ToolDefinition]>,
        options: &GenerationOptions,
    ) -> Result<LlmResponse> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .and_then(|m| m.text.as_deref())
            .unwrap_or_default();

        if prompt.to_lowercase().contains("error") {
            return Err(RagentError::Provider(
                "Mock provider simulated error".to_string(),
            ));
        }

        let mut reply = String::new();
        if let Some(system) = &options.system_instruction {
            reply.push_str(&format!("[System: {}] ", system));
        }
        reply.push_str(&format!("Mock response to: '{}'", prompt));

        Ok(LlmResponse::text(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> MockProvider {
        MockProvider::new().with_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_echoes_last_user_message() {
        let response = provider()
            .generate(
                &[Message::user("first"), Message::user("Hello")],
                None,
                &GenerationOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(response.text.as_deref(), Some("Mock response to: 'Hello'"));
    }

    #[tokio::test]
    async fn test_prefixes_system_instruction() {
        let options = GenerationOptions {
            system_instruction: Some("terse".into()),
            ..Default::default()
        };
        let response = provider()
            .generate(&[Message::user("Hi")], None, &options)
            .await
            .unwrap();
        assert_eq!(
            response.text.as_deref(),
            Some("[System: terse] Mock response to: 'Hi'")
        );
    }

    #[tokio::test]
    async fn test_simulated_error() {
        let result = provider()
            .generate(
                &[Message::user("please raise an error")],
                None,
                &GenerationOptions::default(),
            )
            .await;
        assert!(matches!(result, Err(RagentError::Provider(_))));
    }
}
