//! Exact-match route table.
//!
//! Routes are keyed by `(METHOD, path)` with the method uppercased. There
//! are no patterns or parameters: a path either matches byte for byte or it
//! does not. The table is filled at startup and only read afterwards, so it
//! is shared behind an `Arc` without locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::Request;
use axum::response::Response;

use crate::bootstrap::AxumContext;
use crate::handlers::chat::ChatPipeline;
use crate::handlers::hello::HelloHandler;

/// A request handler. It owns the whole response.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    async fn handle(&self, request: Request) -> Response;
}

/// Shared handle to a registered handler.
pub type Handler = Arc<dyn RouteHandler>;

/// Exact-match `(method, path)` to handler table.
#[derive(Default)]
pub struct Router {
    routes: HashMap<(String, String), Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` and `path`, replacing any previous one.
    pub fn add_route(&mut self, method: &str, path: &str, handler: Handler) {
        self.routes.insert((method.to_ascii_uppercase(), path.to_string()), handler);
    }

    /// Look up the handler for `method` (any case) and `path` (exact, no query).
    pub fn resolve(&self, method: &str, path: &str) -> Option<Handler> {
        self.routes
            .get(&(method.to_ascii_uppercase(), path.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.routes.keys().collect();
        keys.sort();
        f.debug_struct("Router").field("routes", &keys).finish()
    }
}

/// Build the application route table.
pub fn create_router(ctx: &AxumContext) -> Router {
    let mut router = Router::new();
    router.add_route("GET", "/hello", Arc::new(HelloHandler));
    router.add_route(
        "POST",
        "/chat",
        Arc::new(ChatPipeline::new(
            Arc::clone(&ctx.config),
            Arc::clone(&ctx.registry),
        )),
    );
    router
}
