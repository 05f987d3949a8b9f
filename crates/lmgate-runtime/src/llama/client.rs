//! HTTP client for a running llama-server.
//!
//! Uses llama-server's OpenAI-compatible endpoints so responses already
//! have the `choices[...]` layout the core expects:
//!
//! - `POST /v1/chat/completions` for chat-completion models
//! - `POST /v1/completions` for plain completion
//! - `GET /props` to decide which of the two a model supports
//! - `GET /health` for readiness

use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use lmgate_core::{
    CapabilityKind, ChatCompletionModel, ChatMessage, EngineError, SamplingParams,
    TextCompletionModel,
};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Per-request timeout for readiness probes. Inference calls have none.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    messages: &'a [ChatMessage],
    #[serde(flatten)]
    params: &'a SamplingParams,
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    prompt: &'a str,
    #[serde(flatten)]
    params: &'a SamplingParams,
}

/// Client bound to one llama-server base URL.
#[derive(Debug, Clone)]
pub struct LlamaServerClient {
    base_url: String,
    client: Client,
}

impl LlamaServerClient {
    /// Create a client for e.g. `http://127.0.0.1:5500`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Single readiness probe: `true` once `/health` answers 200.
    pub async fn is_ready(&self) -> bool {
        match self
            .client
            .get(self.url("/health"))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Health check failed: {}, retrying...", e);
                false
            }
        }
    }

    /// Decide the generation interface from the server's `/props`.
    pub async fn probe_capability(&self) -> Result<CapabilityKind> {
        let response = self
            .client
            .get(self.url("/props"))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("/props returned status {}", response.status()));
        }

        let props: Value = response.json().await?;
        Ok(capability_kind_from_props(&props))
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Value, EngineError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| EngineError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(EngineError::Request(format!("{path} returned {status}: {text}")));
        }

        response
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))
    }
}

/// Models shipping a chat template get chat completion; the rest fall
/// back to instruction-formatted plain completion.
pub fn capability_kind_from_props(props: &Value) -> CapabilityKind {
    let has_template = props
        .get("chat_template")
        .and_then(Value::as_str)
        .is_some_and(|template| !template.trim().is_empty());

    if has_template {
        CapabilityKind::ChatCompletion
    } else {
        CapabilityKind::LegacyCompletion
    }
}

#[async_trait]
impl ChatCompletionModel for LlamaServerClient {
    async fn create_chat_completion(
        &self,
        messages: &[ChatMessage],
        params: &SamplingParams,
    ) -> Result<Value, EngineError> {
        self.post_json("/v1/chat/completions", &ChatCompletionBody { messages, params })
            .await
    }
}

#[async_trait]
impl TextCompletionModel for LlamaServerClient {
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<Value, EngineError> {
        self.post_json("/v1/completions", &CompletionBody { prompt, params })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_template_selects_chat_completion() {
        let props = json!({"chat_template": "{% for m in messages %}{{ m.content }}{% endfor %}"});
        assert_eq!(
            capability_kind_from_props(&props),
            CapabilityKind::ChatCompletion
        );
    }

    #[test]
    fn missing_or_blank_template_selects_legacy() {
        for props in [json!({}), json!({"chat_template": ""}), json!({"chat_template": null})] {
            assert_eq!(
                capability_kind_from_props(&props),
                CapabilityKind::LegacyCompletion
            );
        }
    }

    #[test]
    fn request_bodies_flatten_sampling_params() {
        let messages = [ChatMessage::user("Hi")];
        let params = SamplingParams::chat();
        let body = serde_json::to_value(ChatCompletionBody {
            messages: &messages,
            params: &params,
        })
        .unwrap();
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("stop").is_none());

        let params = SamplingParams::legacy();
        let body = serde_json::to_value(CompletionBody {
            prompt: "[INST] Hi [/INST]",
            params: &params,
        })
        .unwrap();
        assert_eq!(body["prompt"], "[INST] Hi [/INST]");
        assert_eq!(body["stop"], json!(["</s>", "[INST]"]));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = LlamaServerClient::new("http://127.0.0.1:5500/");
        assert_eq!(client.url("/health"), "http://127.0.0.1:5500/health");
    }
}
