//! Body reading and response writing shared by all handlers.

use axum::body::{Body, Bytes, to_bytes};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::error::ChatError;

/// Hard cap on request bodies (64 KiB).
pub const MAX_BODY_SIZE: usize = 64 * 1024;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Read a request body of exactly the declared `Content-Length`.
///
/// The header is validated before any byte is read, so oversized requests
/// are rejected without buffering them.
pub async fn read_body(headers: &HeaderMap, body: Body) -> Result<Bytes, ChatError> {
    let raw = headers
        .get(CONTENT_LENGTH)
        .ok_or_else(|| ChatError::bad_request("The Content-Length header is required."))?;

    let declared: i64 = raw
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .ok_or_else(|| ChatError::bad_request("The Content-Length header is invalid."))?;

    if declared <= 0 {
        return Err(ChatError::bad_request("The request body is empty."));
    }

    let length = usize::try_from(declared)
        .ok()
        .filter(|length| *length <= MAX_BODY_SIZE)
        .ok_or_else(|| ChatError::bad_request("The request body is too large."))?;

    let bytes = to_bytes(body, length)
        .await
        .map_err(|_| ChatError::bad_request("The request body could not be read."))?;

    if bytes.is_empty() {
        return Err(ChatError::bad_request("The request body is empty."));
    }

    Ok(bytes)
}

/// Parse a UTF-8 JSON document.
pub fn parse_json(bytes: &[u8]) -> Result<Value, ChatError> {
    serde_json::from_slice(bytes)
        .map_err(|_| ChatError::bad_request("The request body is not valid JSON."))
}

/// Serialize `payload` as a JSON response with explicit length.
///
/// Non-ASCII text is written as UTF-8, not escaped.
pub fn json_response<T: Serialize>(status: StatusCode, payload: &T) -> Response {
    match serde_json::to_vec(payload) {
        Ok(body) => (
            status,
            [
                (CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE)),
                (CONTENT_LENGTH, HeaderValue::from(body.len())),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to serialize response body: {e}");
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

/// Plain-text response for the non-JSON error paths.
pub fn text_response(status: StatusCode, message: &'static str) -> Response {
    (
        status,
        [(CONTENT_TYPE, HeaderValue::from_static(TEXT_CONTENT_TYPE))],
        message,
    )
        .into_response()
}
