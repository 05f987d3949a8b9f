//! Inference engine port.
//!
//! An [`InferenceEngine`] turns [`ModelParams`] into a loaded model. The
//! loaded model exposes exactly one of two generation interfaces, captured
//! by [`GenerationCapability`] when the model is constructed. Callers match
//! on the variant instead of probing the model on every request.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{ChatMessage, SamplingParams};

/// Parameters used to construct a model handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelParams {
    /// Absolute path to the model file.
    pub model_path: PathBuf,
    /// Context window in tokens.
    pub context_size: u32,
    /// Inference threads; engine default when `None`.
    pub threads: Option<i32>,
    /// Layers offloaded to the GPU; engine default when `None`.
    pub gpu_layers: Option<i32>,
}

/// Errors reported by an inference engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The model could not be constructed.
    #[error("Model load failed: {0}")]
    Load(String),

    /// A generation call failed.
    #[error("Inference request failed: {0}")]
    Request(String),

    /// The engine answered with something that is not a completion document.
    #[error("Invalid engine response: {0}")]
    InvalidResponse(String),
}

/// Structured chat completion over a message list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCompletionModel: Send + Sync {
    /// Returns an OpenAI-style chat completion document.
    async fn create_chat_completion(
        &self,
        messages: &[ChatMessage],
        params: &SamplingParams,
    ) -> Result<Value, EngineError>;
}

/// Free-text completion of a raw prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextCompletionModel: Send + Sync {
    /// Returns an OpenAI-style text completion document (`choices[].text`).
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<Value, EngineError>;
}

/// The generation interface a loaded model exposes.
#[derive(Clone)]
pub enum GenerationCapability {
    ChatCompletion(Arc<dyn ChatCompletionModel>),
    LegacyCompletion(Arc<dyn TextCompletionModel>),
}

/// Tag of a [`GenerationCapability`], for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    ChatCompletion,
    LegacyCompletion,
}

impl GenerationCapability {
    pub const fn kind(&self) -> CapabilityKind {
        match self {
            Self::ChatCompletion(_) => CapabilityKind::ChatCompletion,
            Self::LegacyCompletion(_) => CapabilityKind::LegacyCompletion,
        }
    }
}

impl fmt::Debug for GenerationCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GenerationCapability")
            .field(&self.kind())
            .finish()
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChatCompletion => f.write_str("chat-completion"),
            Self::LegacyCompletion => f.write_str("legacy-completion"),
        }
    }
}

/// A backend able to load models.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Human-readable engine name used in error messages.
    fn name(&self) -> &str;

    /// Whether the engine's runtime dependency is installed.
    fn is_available(&self) -> bool;

    /// Construct a model handle.
    async fn load(&self, params: ModelParams) -> Result<GenerationCapability, EngineError>;
}
