use async_trait::async_trait;
use serde_json::Value;

use crate::api::response::parse_assistant_message;
use crate::api::{make_api_request, RequestBody};
use crate::config::system_message;
use crate::error::{FinsightError, Result};
use crate::models::Message;

/// A language model that can answer or request tool calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends the whole history plus the declared tools and returns the model's
    /// assistant message, with any tool-call requests attached.
    async fn complete(&self, messages: &[Message], tools: &[Value]) -> Result<Message>;
}

/// Chat-completions client for Groq (or any OpenAI-compatible endpoint).
pub struct GroqChatModel {
    api_key: String,
    api_endpoint: String,
    model: String,
    /// Appended after the date line of the system message.
    system_prompt: Option<String>,
    timeout_secs: u64,
}

impl GroqChatModel {
    pub fn new(
        api_key: impl Into<String>,
        api_endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_endpoint: api_endpoint.into(),
            model: model.into(),
            system_prompt: None,
            timeout_secs,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, messages: &[Message], tools: &[Value]) -> RequestBody {
        let mut request_messages = Vec::with_capacity(messages.len() + 1);
        request_messages.push(Message::system(system_message(
            self.system_prompt.as_deref(),
        )));
        request_messages.extend_from_slice(messages);

        let tools = if tools.is_empty() {
            None
        } else {
            Some(tools.to_vec())
        };

        RequestBody {
            model: self.model.clone(),
            messages: request_messages,
            stream: false,
            tool_choice: tools.as_ref().map(|_| "auto".to_string()),
            tools,
        }
    }
}

#[async_trait]
impl ChatModel for GroqChatModel {
    async fn complete(&self, messages: &[Message], tools: &[Value]) -> Result<Message> {
        let request_body = self.build_request(messages, tools);

        tracing::debug!(
            model = %self.model,
            messages = request_body.messages.len(),
            tools = tools.len(),
            "sending chat completion request"
        );

        let response = make_api_request(
            &self.api_key,
            &self.api_endpoint,
            self.timeout_secs,
            &request_body,
        )
        .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FinsightError::ApiError {
                status,
                message: error_text,
            });
        }

        let response_text = response.text().await?;
        tracing::trace!(body = %response_text, "raw model response");

        let response_json: Value = serde_json::from_str(&response_text)?;
        parse_assistant_message(&response_json)
    }
}
