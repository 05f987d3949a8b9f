//! Per-request entry point.
//!
//! Axum only sees one fallback handler. Every request, whatever its method
//! or path, lands in [`dispatch`], which consults the exact-match
//! [`Router`] and hands the request over untouched.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::Response;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::json_io::text_response;
use crate::routes::Router;

/// State shared with the dispatcher.
#[derive(Clone, Default)]
pub struct DispatchState {
    router: Option<Arc<Router>>,
}

impl DispatchState {
    pub const fn new(router: Option<Arc<Router>>) -> Self {
        Self { router }
    }
}

/// Route one request.
///
/// Query strings never take part in the lookup. The matched handler writes
/// the complete response; nothing is added afterwards.
pub async fn dispatch(State(state): State<DispatchState>, request: Request) -> Response {
    let Some(router) = state.router.as_deref() else {
        error!("Request received before a router was configured");
        return text_response(StatusCode::INTERNAL_SERVER_ERROR, "Router not configured");
    };

    // `Uri::path` excludes the query component.
    let Some(handler) = router.resolve(request.method().as_str(), request.uri().path()) else {
        debug!(method = %request.method(), path = %request.uri().path(), "No route");
        return text_response(StatusCode::NOT_FOUND, "Not Found");
    };

    handler.handle(request).await
}

/// Build the axum application around an optional route table.
pub fn build_app(router: Option<Arc<Router>>) -> axum::Router {
    axum::Router::new()
        .fallback(dispatch)
        .with_state(DispatchState::new(router))
        .layer(TraceLayer::new_for_http())
}
