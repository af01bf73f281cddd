//! Pure Anthropic Messages API client
//!
//! A clean, minimal client for the Anthropic API with no domain-specific
//! logic. Supports multi-turn messages, extended thinking, and tool-forced
//! structured output.
//!
//! # Example
//!
//! ```rust,ignore
//! use anthropic_client::{AnthropicClient, Message, MessagesRequest};
//!
//! let client = AnthropicClient::from_env()?;
//!
//! let response = client
//!     .messages(
//!         MessagesRequest::new("claude-sonnet-4-5")
//!             .system("You are a writing assistant")
//!             .message(Message::user("Draft an opening paragraph"))
//!             .max_tokens(800),
//!     )
//!     .await?;
//!
//! println!("{}", response.text());
//! ```
//!
//! # Type-Safe Structured Output
//!
//! ```rust,ignore
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Outline {
//!     title: String,
//!     sections: Vec<String>,
//! }
//!
//! // Schema generated automatically from the type, delivered as a
//! // forced tool call.
//! let outline: Outline = client
//!     .extract::<Outline>("claude-sonnet-4-5", system_prompt, user_prompt)
//!     .await?;
//! ```

pub mod error;
pub mod schema;
pub mod types;

pub use error::{AnthropicError, Result};
pub use schema::{sanitize_tool_schema, StructuredOutput};
pub use types::*;

use reqwest::Client;
use tracing::{debug, warn};

/// API version header required by the Messages endpoint.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Pure Anthropic API client.
#[derive(Clone)]
pub struct AnthropicClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.anthropic.com/v1".to_string(),
        }
    }

    /// Create from environment variable `ANTHROPIC_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| AnthropicError::Config("ANTHROPIC_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies or gateways).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a Messages API request.
    pub async fn messages(&self, request: MessagesRequest) -> Result<MessagesResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Anthropic request failed");
                AnthropicError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Anthropic API error");
            return Err(AnthropicError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let messages_response: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AnthropicError::Parse(e.to_string()))?;

        debug!(
            model = %request.model,
            stop_reason = ?messages_response.stop_reason,
            duration_ms = start.elapsed().as_millis(),
            "Anthropic messages completion"
        );

        Ok(messages_response)
    }

    /// Type-safe structured output extraction.
    ///
    /// Generates a JSON schema from `T` with `schemars`, forces the model
    /// to call a tool with that schema, and deserializes the tool input.
    pub async fn extract<T: StructuredOutput>(
        &self,
        model: &str,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<T> {
        let schema = T::tool_schema();

        debug!(
            tool = %T::tool_name(),
            schema = %serde_json::to_string(&schema).unwrap_or_default(),
            "Generated tool schema for extraction"
        );

        let tool = ToolDefinition::new(
            T::tool_name(),
            "Record the structured result of this task.",
            schema,
        );

        let request = MessagesRequest::new(model)
            .system(system_prompt)
            .message(Message::user(user_prompt))
            .max_tokens(2048)
            .forced_tool(tool);

        let response = self.messages(request).await?;
        let input = response
            .tool_input()
            .ok_or_else(|| AnthropicError::Parse("no tool_use block in response".into()))?;

        serde_json::from_value(input.clone())
            .map_err(|e| AnthropicError::Parse(format!("Failed to deserialize tool input: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = AnthropicClient::new("sk-ant-test").with_base_url("https://proxy.internal/v1");

        assert_eq!(client.api_key, "sk-ant-test");
        assert_eq!(client.base_url(), "https://proxy.internal/v1");
    }
}
