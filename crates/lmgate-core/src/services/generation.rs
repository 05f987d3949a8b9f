//! Reply generation.
//!
//! Bridges a validated user message to whichever generation interface the
//! loaded model exposes, and reduces the engine's completion document to
//! the reply text.

use thiserror::Error;
use tracing::debug;

use crate::domain::inference::{chat_completion_text, completion_text, instruction_prompt};
use crate::domain::{ChatMessage, SamplingParams};
use crate::ports::{EngineError, GenerationCapability};

/// System instruction sent ahead of the user message in chat mode.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Public text for any failure inside the model.
pub const INFERENCE_ERROR_MESSAGE: &str = "An error occurred during inference.";

/// Generation failed inside the engine.
///
/// The wrapped cause is for logs only; clients get a fixed message.
#[derive(Debug, Error)]
#[error("{}", INFERENCE_ERROR_MESSAGE)]
pub struct GenerationError(#[source] pub EngineError);

/// Generate a reply to `message` with the model's capability.
pub async fn generate_reply(
    capability: &GenerationCapability,
    message: &str,
) -> Result<String, GenerationError> {
    debug!(capability = %capability.kind(), "Generating reply");

    match capability {
        GenerationCapability::ChatCompletion(model) => {
            let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(message)];
            let result = model
                .create_chat_completion(&messages, &SamplingParams::chat())
                .await
                .map_err(GenerationError)?;
            Ok(chat_completion_text(&result))
        }
        GenerationCapability::LegacyCompletion(model) => {
            let result = model
                .complete(&instruction_prompt(message), &SamplingParams::legacy())
                .await
                .map_err(GenerationError)?;
            Ok(completion_text(&result))
        }
    }
}
