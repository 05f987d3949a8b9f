//! Lazily initialized model registry.
//!
//! [`ModelRegistry`] owns at most one loaded model per instance. The first
//! caller of [`ModelRegistry::get_model`] builds it; everyone else gets the
//! same `Arc`. Only successful loads are cached: a failed attempt leaves the
//! slot empty so a later request can retry once the operator fixes the
//! problem.
//!
//! Generation calls on the returned model are not serialized here. Whether
//! concurrent inference is safe is up to the engine behind the handle.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::Config;
use crate::paths::{PathError, resolve_model_path};
use crate::ports::{CapabilityKind, EngineError, GenerationCapability, InferenceEngine, ModelParams};

/// Errors that make the model unavailable. Callers should answer 503.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    /// The inference engine is not installed.
    #[error(
        "Inference engine `{engine}` is not installed. Install llama.cpp or set LLAMA_SERVER_PATH to the llama-server binary."
    )]
    EngineUnavailable { engine: String },

    /// The configured model file does not exist.
    #[error("Model file does not exist: {}. Set LLM_MODEL_PATH to a valid model file.", path.display())]
    ModelFileMissing { path: PathBuf },

    /// The request named a model this process does not serve.
    #[error(
        "Requested model `{requested}` is not supported by this deployment. Switch the default model with LLM_MODEL_ID."
    )]
    UnsupportedModel { requested: String },

    /// The configured model path could not be resolved.
    #[error("Invalid model path: {0}")]
    Path(#[from] PathError),

    /// The engine failed to construct the model.
    #[error("An error occurred while initializing the model.")]
    Construction(#[source] EngineError),
}

/// A model ready to serve generation calls.
#[derive(Debug)]
pub struct LoadedModel {
    model_path: PathBuf,
    capability: GenerationCapability,
}

impl LoadedModel {
    pub fn new(model_path: PathBuf, capability: GenerationCapability) -> Self {
        Self {
            model_path,
            capability,
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub const fn capability(&self) -> &GenerationCapability {
        &self.capability
    }

    pub const fn kind(&self) -> CapabilityKind {
        self.capability.kind()
    }
}

/// Owner of the process' single model handle.
///
/// Cheap to share: clones of the inner state travel into the background
/// task that performs the load.
pub struct ModelRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    engine: Arc<dyn InferenceEngine>,
    slot: OnceLock<Arc<LoadedModel>>,
    init_lock: Mutex<()>,
}

impl ModelRegistry {
    pub fn new(engine: Arc<dyn InferenceEngine>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                engine,
                slot: OnceLock::new(),
                init_lock: Mutex::new(()),
            }),
        }
    }

    /// Whether a model has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.inner.slot.get().is_some()
    }

    /// Return the shared model, loading it on first use.
    ///
    /// At most one load runs at a time. Callers that wait on an in-flight
    /// load either receive its result or, if it failed, try again themselves.
    ///
    /// The slow path runs on a spawned task. Dropping the returned future
    /// (for example when a client disconnects) does not abort a load that
    /// is already under way; its result is still published.
    pub async fn get_model(&self, config: &Config) -> Result<Arc<LoadedModel>, ModelLoadError> {
        if let Some(model) = self.inner.slot.get() {
            return Ok(Arc::clone(model));
        }

        let inner = Arc::clone(&self.inner);
        let config = config.clone();
        tokio::spawn(async move { inner.acquire(&config).await })
            .await
            .map_err(|e| {
                ModelLoadError::Construction(EngineError::Load(format!(
                    "model initialization task failed: {e}"
                )))
            })?
    }
}

impl RegistryInner {
    async fn acquire(&self, config: &Config) -> Result<Arc<LoadedModel>, ModelLoadError> {
        let _guard = self.init_lock.lock().await;

        if let Some(model) = self.slot.get() {
            debug!("Model was loaded by a concurrent caller");
            return Ok(Arc::clone(model));
        }

        let model = Arc::new(self.initialize(config).await?);
        // Only writer is this critical section, so the slot is still empty.
        let _ = self.slot.set(Arc::clone(&model));
        Ok(model)
    }

    async fn initialize(&self, config: &Config) -> Result<LoadedModel, ModelLoadError> {
        if !self.engine.is_available() {
            return Err(ModelLoadError::EngineUnavailable {
                engine: self.engine.name().to_string(),
            });
        }

        let model_path = resolve_model_path(&config.model_path)?;
        if !model_path.exists() {
            return Err(ModelLoadError::ModelFileMissing { path: model_path });
        }

        info!(
            model_id = %config.model_id,
            model_path = %model_path.display(),
            context = config.model_context,
            threads = ?config.model_threads,
            gpu_layers = ?config.model_gpu_layers,
            "Loading model"
        );

        let params = ModelParams {
            model_path: model_path.clone(),
            context_size: config.model_context,
            threads: config.model_threads,
            gpu_layers: config.model_gpu_layers,
        };
        let capability = self
            .engine
            .load(params)
            .await
            .map_err(ModelLoadError::Construction)?;

        info!(
            model_id = %config.model_id,
            capability = %capability.kind(),
            "Model loaded"
        );

        Ok(LoadedModel::new(model_path, capability))
    }
}
