//! Liveness greeting.

use async_trait::async_trait;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::json;

use crate::json_io::json_response;
use crate::routes::RouteHandler;

/// `GET /hello` returns `{"message": "hello"}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelloHandler;

#[async_trait]
impl RouteHandler for HelloHandler {
    async fn handle(&self, _request: Request) -> Response {
        json_response(StatusCode::OK, &json!({ "message": "hello" }))
    }
}
