//! CLI entry point - the composition root.
//!
//! Loads configuration, wires the llama-server engine into the registry and
//! runs the HTTP server until Ctrl-C.

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lmgate_axum::{bootstrap, start_server};
use lmgate_cli::Cli;
use lmgate_core::load_config;
use lmgate_runtime::LlamaServerEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = load_config(&cli.env_file, cli.override_env);
    cli.apply_overrides(&mut config);

    let engine = Arc::new(LlamaServerEngine::new(config.llama_server_path.clone()));
    let ctx = bootstrap(config, engine);

    if cli.no_preload {
        info!("Model will be loaded on the first chat request");
    } else if let Err(e) = ctx.preload_model().await {
        warn!("Model preload failed, serving anyway: {e}");
    }
    info!(
        model_id = %ctx.config.model_id,
        loaded = ctx.registry.is_loaded(),
        "Starting server"
    );

    start_server(ctx, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
