//! Port definitions implemented by inference runtimes.

mod engine;

pub use engine::{
    CapabilityKind, ChatCompletionModel, EngineError, GenerationCapability, InferenceEngine,
    ModelParams, TextCompletionModel,
};

#[cfg(test)]
pub use engine::{MockChatCompletionModel, MockTextCompletionModel};
