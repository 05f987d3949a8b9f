//! Axum server bootstrap - the composition root.
//!
//! Wires the configuration, the model registry and the route table
//! together and runs the HTTP server.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use lmgate_core::{Config, InferenceEngine, ModelLoadError, ModelRegistry};
use tokio::net::TcpListener;
use tracing::info;

use crate::dispatch::build_app;
use crate::routes::create_router;

/// Application context for the Axum adapter.
#[derive(Clone)]
pub struct AxumContext {
    /// Immutable server configuration.
    pub config: Arc<Config>,
    /// Owner of the single model handle.
    pub registry: Arc<ModelRegistry>,
}

impl AxumContext {
    /// Load the model ahead of the first request.
    pub async fn preload_model(&self) -> Result<(), ModelLoadError> {
        self.registry.get_model(&self.config).await.map(|_| ())
    }
}

/// Build the context for `config` on top of `engine`.
pub fn bootstrap(config: Config, engine: Arc<dyn InferenceEngine>) -> AxumContext {
    AxumContext {
        config: Arc::new(config),
        registry: Arc::new(ModelRegistry::new(engine)),
    }
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, ctx: &AxumContext, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(Some(Arc::new(create_router(ctx))));

    info!("lmgate listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shut down");
    Ok(())
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn start_server<F>(ctx: AxumContext, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(ctx.config.bind_address()).await?;
    serve(listener, &ctx, shutdown).await
}
