//! Chat error taxonomy and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lmgate_core::{INFERENCE_ERROR_MESSAGE, ModelLoadError};
use serde_json::json;
use thiserror::Error;

use crate::json_io::json_response;

/// Ways a chat request can fail, each with a fixed status code.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Malformed, oversized or semantically invalid input. The message is
    /// returned to the client verbatim.
    #[error("{0}")]
    BadRequest(String),

    /// The model cannot be produced or the requested model is not served.
    #[error(transparent)]
    ModelUnavailable(#[from] ModelLoadError),

    /// Generation failed. Details are logged, never returned.
    #[error("{}", INFERENCE_ERROR_MESSAGE)]
    Internal,
}

impl ChatError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        json_response(self.status(), &json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lmgate_core::{EngineError, GenerationError};

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(ChatError::bad_request("nope").status(), StatusCode::BAD_REQUEST);
        let unsupported = ModelLoadError::UnsupportedModel {
            requested: "x".to_string(),
        };
        assert_eq!(ChatError::from(unsupported).status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ChatError::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_error_uses_fixed_message() {
        let cause = GenerationError(EngineError::Request("reset".to_string()));
        assert_eq!(ChatError::Internal.to_string(), INFERENCE_ERROR_MESSAGE);
        assert_eq!(ChatError::Internal.to_string(), cause.to_string());
    }
}
