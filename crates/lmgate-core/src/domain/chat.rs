//! Chat request validation.
//!
//! A chat request arrives as an arbitrary JSON document. Validation happens
//! on a [`serde_json::Value`] rather than through `Deserialize` so each
//! failure gets its own client-facing message.

use serde_json::Value;
use thiserror::Error;

/// A validated chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// The user message, trimmed and non-empty.
    pub message: String,
    /// Requested model id, trimmed and non-empty. `None` means the default model.
    pub model: Option<String>,
}

/// Reasons a chat payload is rejected. All are safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatValidationError {
    #[error("Request body must be a JSON object.")]
    NotAnObject,

    #[error("The `message` field must be a non-empty string.")]
    InvalidMessage,

    #[error("The `model` field must be a non-empty string when provided.")]
    InvalidModel,
}

impl ChatRequest {
    /// Validate a parsed JSON payload.
    pub fn from_value(payload: &Value) -> Result<Self, ChatValidationError> {
        let object = payload
            .as_object()
            .ok_or(ChatValidationError::NotAnObject)?;

        let message = object
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .ok_or(ChatValidationError::InvalidMessage)?;

        let model = match object.get("model") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                value
                    .as_str()
                    .map(str::trim)
                    .filter(|model| !model.is_empty())
                    .ok_or(ChatValidationError::InvalidModel)?
                    .to_string(),
            ),
        };

        Ok(Self {
            message: message.to_string(),
            model,
        })
    }
}
