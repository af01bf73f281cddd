//! [`TextModel`] backed by the Anthropic Messages API.
//!
//! Effort maps to a thinking budget. Structured requests are served by
//! forcing a single tool call whose input schema is the requested
//! schema; the tool input comes back re-serialized as the reply text,
//! so the pipeline's JSON extraction sees clean JSON.

use std::time::Duration;

use anthropic_client::{
    sanitize_tool_schema, AnthropicClient, Message, MessagesRequest, MessagesResponse,
    ToolDefinition,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{AuthoringError, Result};
use crate::traits::generator::{Effort, GenerateRequest, ModelReply, Role, TextModel};

/// Tool name used for forced structured output.
const OUTPUT_TOOL: &str = "record_output";

/// Retries after the first attempt on retryable errors.
const MAX_RETRIES: u32 = 3;

/// Base delay for the linear backoff between retries.
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Anthropic-backed text model.
pub struct AnthropicModel {
    client: AnthropicClient,
    model: String,
}

impl AnthropicModel {
    pub fn new(client: AnthropicClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Build the client from `ANTHROPIC_API_KEY`.
    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let client = AnthropicClient::from_env().map_err(AuthoringError::model)?;
        Ok(Self::new(client, model))
    }

    fn thinking_budget(effort: Effort) -> Option<u32> {
        match effort {
            Effort::Low => None,
            Effort::Medium => Some(2048),
            Effort::High => Some(4096),
            Effort::Max => Some(8192),
        }
    }

    fn build_request(&self, request: &GenerateRequest) -> MessagesRequest {
        let messages = request
            .conversation
            .iter()
            .map(|turn| match turn.role {
                Role::User => Message::user(turn.content.clone()),
                Role::Assistant => Message::assistant(turn.content.clone()),
            })
            .collect();

        let mut out = MessagesRequest::new(&self.model)
            .system(request.system.clone())
            .messages(messages)
            .max_tokens(request.max_output);

        // The API rejects extended thinking combined with a forced tool,
        // so structured calls run without a thinking budget
        if request.schema.is_none() {
            if let Some(budget) = Self::thinking_budget(request.effort) {
                // Budget must stay below max_tokens and above the API
                // minimum of 1024
                let budget = budget.min(request.max_output.saturating_sub(1024));
                if budget >= 1024 {
                    out = out.thinking(budget);
                }
            }
        }

        if let Some(schema) = &request.schema {
            // Tool schemas can't carry $ref; inline before sending
            let mut schema = schema.clone();
            sanitize_tool_schema(&mut schema);
            out = out.forced_tool(ToolDefinition::new(
                OUTPUT_TOOL,
                "Record the structured result of this request.",
                schema,
            ));
        }

        out
    }

    /// Call with a bounded linear backoff on retryable failures.
    async fn call_with_retry(&self, request: MessagesRequest) -> Result<MessagesResponse> {
        let mut attempt = 0;
        loop {
            match self.client.messages(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < MAX_RETRIES => {
                    attempt += 1;
                    let delay = RETRY_DELAY * attempt;
                    warn!(attempt, delay_secs = delay.as_secs(), error = %e, "retrying model call");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(AuthoringError::model(e)),
            }
        }
    }
}

#[async_trait]
impl TextModel for AnthropicModel {
    async fn generate(&self, request: &GenerateRequest) -> Result<ModelReply> {
        let structured = request.schema.is_some();
        let response = self.call_with_retry(self.build_request(request)).await?;

        if response.truncated() {
            warn!(id = %response.id, "model reply truncated at max_tokens");
        }

        let text = if structured {
            let input = response
                .tool_input()
                .ok_or_else(|| AuthoringError::Unparseable {
                    reason: "structured call returned no tool input".into(),
                })?;
            serde_json::to_string(input)?
        } else {
            response.text()
        };
        debug!(chars = text.len(), structured, "model reply");

        let raw_blocks = response
            .content
            .iter()
            .filter_map(|block| serde_json::to_value(block).ok())
            .collect();

        Ok(ModelReply { text, raw_blocks })
    }
}
