//! Inference request and response shapes.
//!
//! Engines return raw JSON documents in the OpenAI completion layout
//! (`choices[0].message.content` for chat, `choices[0].text` for plain
//! completion). The extractors here tolerate any other shape by returning
//! an empty string.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound on generated tokens per reply.
pub const MAX_REPLY_TOKENS: u32 = 256;

/// Sampling temperature used for replies.
pub const REPLY_TEMPERATURE: f32 = 0.7;

/// Nucleus sampling threshold used for replies.
pub const REPLY_TOP_P: f32 = 0.95;

/// Stop sequences for instruction-formatted plain completion.
pub const LEGACY_STOP_SEQUENCES: [&str; 2] = ["</s>", "[INST]"];

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A single message sent to a chat-completion capable model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Sampling parameters for a single generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

impl SamplingParams {
    /// Parameters for structured chat completion.
    pub fn chat() -> Self {
        Self {
            max_tokens: MAX_REPLY_TOKENS,
            temperature: REPLY_TEMPERATURE,
            top_p: REPLY_TOP_P,
            stop: Vec::new(),
        }
    }

    /// Parameters for instruction-formatted plain completion.
    pub fn legacy() -> Self {
        Self {
            stop: LEGACY_STOP_SEQUENCES.iter().map(ToString::to_string).collect(),
            ..Self::chat()
        }
    }
}

/// Wrap a user message in instruction delimiters for plain completion.
pub fn instruction_prompt(message: &str) -> String {
    format!("[INST] {message} [/INST]")
}

/// Extract `choices[0].message.content`, trimmed.
pub fn chat_completion_text(result: &Value) -> String {
    result
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

/// Extract `choices[0].text`, trimmed.
pub fn completion_text(result: &Value) -> String {
    result
        .pointer("/choices/0/text")
        .and_then(Value::as_str)
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}
