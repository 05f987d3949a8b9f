//! [`InferenceEngine`] backed by a supervised llama-server process.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use lmgate_core::{
    CapabilityKind, ChatCompletionModel, ChatMessage, EngineError, GenerationCapability,
    InferenceEngine, ModelParams, SamplingParams, TextCompletionModel,
};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use super::args::server_args;
use super::client::LlamaServerClient;
use super::detect::{LLAMA_SERVER_BINARY, locate_llama_server};
use super::ports::allocate_port;

/// How long a freshly spawned server may take to load its model.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Engine that runs one llama-server child per loaded model.
#[derive(Debug, Clone)]
pub struct LlamaServerEngine {
    explicit_path: Option<PathBuf>,
    startup_timeout: Duration,
}

impl LlamaServerEngine {
    /// Create an engine. `explicit_path` overrides the `PATH` lookup.
    pub const fn new(explicit_path: Option<PathBuf>) -> Self {
        Self {
            explicit_path,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
        }
    }

    /// Override the startup timeout.
    #[must_use]
    pub const fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    fn binary(&self) -> Option<PathBuf> {
        locate_llama_server(self.explicit_path.as_deref())
    }

    async fn spawn_model(&self, params: &ModelParams) -> Result<LlamaServerModel> {
        let binary = self
            .binary()
            .ok_or_else(|| anyhow!("{LLAMA_SERVER_BINARY} binary not found"))?;
        let port = allocate_port().context("Failed to allocate a port for llama-server")?;

        let mut cmd = Command::new(&binary);
        cmd.args(server_args(params, port))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn {}", binary.display()))?;

        debug!(
            binary = %binary.display(),
            pid = ?child.id(),
            port,
            "Spawned llama-server"
        );

        if let Some(stdout) = child.stdout.take() {
            forward_output(stdout, port);
        }
        if let Some(stderr) = child.stderr.take() {
            forward_output(stderr, port);
        }

        let client = LlamaServerClient::new(format!("http://127.0.0.1:{port}"));
        wait_until_ready(&client, &mut child, self.startup_timeout).await?;

        let kind = match client.probe_capability().await {
            Ok(kind) => kind,
            Err(e) => {
                warn!("Capability probe failed, using plain completion: {e:#}");
                CapabilityKind::LegacyCompletion
            }
        };

        Ok(LlamaServerModel {
            client,
            kind,
            _process: child,
        })
    }
}

#[async_trait]
impl InferenceEngine for LlamaServerEngine {
    fn name(&self) -> &str {
        LLAMA_SERVER_BINARY
    }

    fn is_available(&self) -> bool {
        self.binary().is_some()
    }

    async fn load(&self, params: ModelParams) -> Result<GenerationCapability, EngineError> {
        let model = self
            .spawn_model(&params)
            .await
            .map_err(|e| EngineError::Load(format!("{e:#}")))?;

        info!(
            base_url = %model.client.base_url(),
            capability = %model.kind,
            "llama-server ready"
        );

        let model = Arc::new(model);
        Ok(match model.kind {
            CapabilityKind::ChatCompletion => GenerationCapability::ChatCompletion(model),
            CapabilityKind::LegacyCompletion => GenerationCapability::LegacyCompletion(model),
        })
    }
}

/// A model served by a child llama-server.
///
/// The child is killed when the model is dropped.
#[derive(Debug)]
pub struct LlamaServerModel {
    client: LlamaServerClient,
    kind: CapabilityKind,
    // Held for `kill_on_drop`.
    _process: Child,
}

#[async_trait]
impl ChatCompletionModel for LlamaServerModel {
    async fn create_chat_completion(
        &self,
        messages: &[ChatMessage],
        params: &SamplingParams,
    ) -> Result<Value, EngineError> {
        self.client.create_chat_completion(messages, params).await
    }
}

#[async_trait]
impl TextCompletionModel for LlamaServerModel {
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<Value, EngineError> {
        self.client.complete(prompt, params).await
    }
}

/// Poll `/health` until the server is ready, the child exits, or the timeout passes.
async fn wait_until_ready(
    client: &LlamaServerClient,
    child: &mut Child,
    timeout: Duration,
) -> Result<()> {
    info!("Waiting for llama-server to be ready at {}", client.base_url());
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(status) = child.try_wait()? {
            return Err(anyhow!("llama-server exited during startup ({status})"));
        }

        if client.is_ready().await {
            return Ok(());
        }

        if Instant::now() >= deadline {
            return Err(anyhow!(
                "llama-server failed to become ready within {}s",
                timeout.as_secs()
            ));
        }

        sleep(POLL_INTERVAL).await;
    }
}

fn forward_output<R>(stream: R, port: u16)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(target: "lmgate.llama", port, "{line}");
        }
        debug!(port, "llama-server output reader exiting");
    });
}
