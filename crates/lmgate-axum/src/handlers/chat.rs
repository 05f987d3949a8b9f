//! `POST /chat`: validate, resolve the model, generate.
//!
//! Cheap checks run first. Nothing touches the registry until the body has
//! been read within its size cap, parsed and validated, so malformed input
//! never triggers a model load.
//!
//! | Failure | Status |
//! |---------|--------|
//! | bad header, oversize body, bad JSON, bad fields | 400 |
//! | model cannot be loaded, unknown model id | 503 |
//! | generation failed | 500 |

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use lmgate_core::{
    ChatRequest, Config, LoadedModel, ModelLoadError, ModelRegistry, generate_reply,
};
use serde_json::json;
use tracing::{debug, error, warn};

use crate::error::ChatError;
use crate::json_io::{json_response, parse_json, read_body};
use crate::routes::RouteHandler;

/// The chat request pipeline.
pub struct ChatPipeline {
    config: Arc<Config>,
    registry: Arc<ModelRegistry>,
}

impl ChatPipeline {
    pub const fn new(config: Arc<Config>, registry: Arc<ModelRegistry>) -> Self {
        Self { config, registry }
    }

    /// Run the pipeline and return the reply text.
    pub async fn run(&self, headers: &HeaderMap, body: Body) -> Result<String, ChatError> {
        let bytes = read_body(headers, body).await?;
        let payload = parse_json(&bytes)?;
        let request =
            ChatRequest::from_value(&payload).map_err(|e| ChatError::bad_request(e.to_string()))?;

        let model = self.resolve_model(request.model.as_deref()).await?;

        generate_reply(model.capability(), &request.message)
            .await
            .map_err(|e| {
                error!(error = ?e, "Inference failed");
                ChatError::Internal
            })
    }

    /// Only the configured model is served; any other id is unavailable.
    async fn resolve_model(
        &self,
        requested: Option<&str>,
    ) -> Result<Arc<LoadedModel>, ModelLoadError> {
        match requested {
            Some(model_id) if model_id != self.config.model_id => {
                debug!(requested = model_id, served = %self.config.model_id, "Unsupported model");
                Err(ModelLoadError::UnsupportedModel {
                    requested: model_id.to_string(),
                })
            }
            _ => self.registry.get_model(&self.config).await.inspect_err(|e| {
                warn!("Model unavailable: {e}");
            }),
        }
    }
}

#[async_trait]
impl RouteHandler for ChatPipeline {
    async fn handle(&self, request: Request) -> Response {
        let (parts, body) = request.into_parts();
        match self.run(&parts.headers, body).await {
            Ok(message) => json_response(StatusCode::OK, &json!({ "message": message })),
            Err(e) => e.into_response(),
        }
    }
}
