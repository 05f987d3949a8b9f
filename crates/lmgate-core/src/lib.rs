//! Core domain for lmgate.
//!
//! This crate owns everything that is independent of the HTTP adapter and of
//! the concrete inference backend:
//!
//! - [`config`]: the immutable [`Config`] value and its `.env` loader
//! - [`paths`]: model path expansion
//! - [`domain`]: chat request validation and sampling parameters
//! - [`ports`]: the inference engine interface implemented by runtimes
//! - [`registry`]: the lazily initialized [`ModelRegistry`]
//! - [`services`]: reply generation on top of a loaded model

#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod paths;
pub mod ports;
pub mod registry;
pub mod services;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError, load_config, load_env};
pub use domain::{ChatMessage, ChatRequest, ChatValidationError, SamplingParams};
pub use paths::{PathError, resolve_model_path};
pub use ports::{
    CapabilityKind, ChatCompletionModel, EngineError, GenerationCapability, InferenceEngine,
    ModelParams, TextCompletionModel,
};
pub use registry::{LoadedModel, ModelLoadError, ModelRegistry};
pub use services::{GenerationError, INFERENCE_ERROR_MESSAGE, generate_reply};

#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tempfile as _;
