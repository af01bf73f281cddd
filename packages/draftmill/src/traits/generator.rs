//! TextModel trait for generative model calls.
//!
//! The trait abstracts one operation: turn a system prompt plus an
//! accumulated conversation into text, at a requested reasoning effort.
//! When a `schema` is supplied, implementations must return text that is
//! a JSON document conforming to it (structured mode).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a model conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Reasoning effort for a generation call.
///
/// Providers map this to whatever lever they have (thinking budget,
/// reasoning tokens). Ordered from cheapest to most expensive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Effort {
    Low,
    Medium,
    High,
    Max,
}

/// A generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// System instructions for the call
    pub system: String,

    /// Accumulated conversation (may be empty for a fresh context)
    pub conversation: Vec<Turn>,

    /// Reasoning effort
    pub effort: Effort,

    /// Maximum output tokens
    pub max_output: u32,

    /// Optional JSON schema for structured output
    pub schema: Option<serde_json::Value>,
}

impl GenerateRequest {
    /// Create a new request with the given system prompt.
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            conversation: Vec::new(),
            effort: Effort::Medium,
            max_output: 2048,
            schema: None,
        }
    }

    /// Append a turn to the conversation.
    pub fn turn(mut self, turn: Turn) -> Self {
        self.conversation.push(turn);
        self
    }

    /// Replace the conversation.
    pub fn conversation(mut self, turns: Vec<Turn>) -> Self {
        self.conversation = turns;
        self
    }

    /// Set the reasoning effort.
    pub fn effort(mut self, effort: Effort) -> Self {
        self.effort = effort;
        self
    }

    /// Set the maximum output tokens.
    pub fn max_output(mut self, max_output: u32) -> Self {
        self.max_output = max_output;
        self
    }

    /// Request structured output conforming to the schema.
    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// The last user turn, if any.
    pub fn last_user_content(&self) -> Option<&str> {
        self.conversation
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .map(|t| t.content.as_str())
    }
}

/// A model reply.
#[derive(Debug, Clone)]
pub struct ModelReply {
    /// Concatenated text output. In structured mode this is the JSON
    /// document itself.
    pub text: String,

    /// Raw provider content blocks, kept for diagnostics.
    pub raw_blocks: Vec<serde_json::Value>,
}

impl ModelReply {
    /// Create a reply from plain text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            raw_blocks: Vec::new(),
        }
    }
}

/// TextModel trait for generative calls.
///
/// Implementations wrap specific providers and handle the specifics of
/// request shaping, retry on transient errors, and response flattening.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Generate a reply for the request.
    async fn generate(&self, request: &GenerateRequest) -> Result<ModelReply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = GenerateRequest::new("system prompt")
            .turn(Turn::user("first"))
            .turn(Turn::assistant("reply"))
            .turn(Turn::user("second"))
            .effort(Effort::High)
            .max_output(4000);

        assert_eq!(req.conversation.len(), 3);
        assert_eq!(req.effort, Effort::High);
        assert_eq!(req.last_user_content(), Some("second"));
    }

    #[test]
    fn test_effort_ordering() {
        assert!(Effort::Low < Effort::Medium);
        assert!(Effort::High < Effort::Max);
    }
}
