//! Shared fixtures for lmgate-axum integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lmgate_core::{
    ChatCompletionModel, ChatMessage, Config, EngineError, GenerationCapability, InferenceEngine,
    ModelParams, SamplingParams, TextCompletionModel,
};
use serde_json::{Value, json};

/// Model id served by the test configuration.
pub const TEST_MODEL_ID: &str = "test/fake-model";

/// What the fake model does on each generation call.
#[derive(Clone)]
pub enum Behavior {
    Chat(&'static str),
    Legacy(&'static str),
    FailGeneration,
}

/// In-memory engine counting its loads.
pub struct FakeEngine {
    behavior: Behavior,
    load_delay: Duration,
    loads: AtomicUsize,
    completed_loads: AtomicUsize,
    generations: Arc<AtomicUsize>,
}

impl FakeEngine {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Self::with_load_delay(behavior, Duration::ZERO)
    }

    /// An engine whose `load` takes `load_delay` to finish.
    pub fn with_load_delay(behavior: Behavior, load_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            load_delay,
            loads: AtomicUsize::new(0),
            completed_loads: AtomicUsize::new(0),
            generations: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn completed_loads(&self) -> usize {
        self.completed_loads.load(Ordering::SeqCst)
    }

    pub fn generations(&self) -> usize {
        self.generations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceEngine for FakeEngine {
    fn name(&self) -> &str {
        "fake"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn load(&self, _params: ModelParams) -> Result<GenerationCapability, EngineError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
        self.completed_loads.fetch_add(1, Ordering::SeqCst);
        let model = Arc::new(FakeModel {
            behavior: self.behavior.clone(),
            generations: Arc::clone(&self.generations),
        });
        Ok(match self.behavior {
            Behavior::Legacy(_) => GenerationCapability::LegacyCompletion(model),
            Behavior::Chat(_) | Behavior::FailGeneration => {
                GenerationCapability::ChatCompletion(model)
            }
        })
    }
}

struct FakeModel {
    behavior: Behavior,
    generations: Arc<AtomicUsize>,
}

impl FakeModel {
    fn record(&self) -> Result<(), EngineError> {
        self.generations.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::FailGeneration => Err(EngineError::Request("boom".to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ChatCompletionModel for FakeModel {
    async fn create_chat_completion(
        &self,
        messages: &[ChatMessage],
        _params: &SamplingParams,
    ) -> Result<Value, EngineError> {
        self.record()?;
        let reply = match self.behavior {
            Behavior::Chat(reply) => reply,
            _ => "",
        };
        assert_eq!(messages.len(), 2);
        Ok(json!({ "choices": [{ "message": { "role": "assistant", "content": reply } }] }))
    }
}

#[async_trait]
impl TextCompletionModel for FakeModel {
    async fn complete(&self, prompt: &str, _params: &SamplingParams) -> Result<Value, EngineError> {
        self.record()?;
        let reply = match self.behavior {
            Behavior::Legacy(reply) => reply,
            _ => "",
        };
        assert!(prompt.contains("[INST]"));
        Ok(json!({ "choices": [{ "text": format!("  {reply}\n") }] }))
    }
}

/// Configuration pointing at `model_path`.
pub fn test_config(model_path: &Path) -> Config {
    Config {
        model_id: TEST_MODEL_ID.to_string(),
        model_path: model_path.display().to_string(),
        ..Config::default()
    }
}
