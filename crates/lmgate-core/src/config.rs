//! Application configuration.
//!
//! [`Config`] is built once at startup and treated as read-only afterwards.
//! Values come from the process environment, optionally seeded from a
//! `.env` file. Every field has a fallback, so building a `Config` never
//! fails; only reading the `.env` file can.

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Default bind address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// Model identifier served when a request does not name one.
pub const DEFAULT_MODEL_ID: &str = "elyza/Llama-3-ELYZA-JP-8B-GGUF";

/// Model file used when `LLM_MODEL_PATH` is not set, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/Llama-3-ELYZA-JP-8B-q4_k_m.gguf";

/// Default context window in tokens.
pub const DEFAULT_CONTEXT_SIZE: u32 = 4096;

/// Default location of the dotenv file.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Environment variable names read by [`Config::from_env`].
pub mod keys {
    pub const HOST: &str = "APP_HOST";
    pub const PORT: &str = "APP_PORT";
    pub const MODEL_ID: &str = "LLM_MODEL_ID";
    pub const MODEL_PATH: &str = "LLM_MODEL_PATH";
    pub const CONTEXT_SIZE: &str = "LLM_CONTEXT_SIZE";
    pub const THREADS: &str = "LLM_THREADS";
    pub const GPU_LAYERS: &str = "LLM_GPU_LAYERS";
    pub const LLAMA_SERVER_PATH: &str = "LLAMA_SERVER_PATH";
}

/// Errors raised while loading the dotenv file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or parsed.
    #[error("Failed to load env file {path}: {reason}")]
    EnvFile { path: PathBuf, reason: String },
}

/// Immutable server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Identifier of the single model this process serves.
    pub model_id: String,
    /// Model file path as configured (may be relative or start with `~`).
    pub model_path: String,
    /// Context window passed to the engine.
    pub model_context: u32,
    /// Inference thread count; engine default when `None`.
    pub model_threads: Option<i32>,
    /// Layers offloaded to the GPU; engine default when `None`.
    pub model_gpu_layers: Option<i32>,
    /// Explicit llama-server binary; searched on `PATH` when `None`.
    pub llama_server_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Build a config from the current process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. Numeric values that fail to parse
    /// fall back to their defaults instead of failing.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.is_empty());

        Self {
            host: read(keys::HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(read(keys::PORT), keys::PORT, DEFAULT_PORT),
            model_id: read(keys::MODEL_ID).unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            model_path: read(keys::MODEL_PATH).unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string()),
            model_context: parse_or(
                read(keys::CONTEXT_SIZE),
                keys::CONTEXT_SIZE,
                DEFAULT_CONTEXT_SIZE,
            ),
            model_threads: parse_optional(read(keys::THREADS), keys::THREADS),
            model_gpu_layers: parse_optional(read(keys::GPU_LAYERS), keys::GPU_LAYERS),
            llama_server_path: read(keys::LLAMA_SERVER_PATH).map(PathBuf::from),
        }
    }

    /// Socket address string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> T {
    parse_optional(raw, key).unwrap_or(default)
}

fn parse_optional<T: std::str::FromStr>(raw: Option<String>, key: &str) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable configuration value");
            None
        }
    }
}

/// Load `KEY=VALUE` pairs from a dotenv file into the process environment.
///
/// Quoted values and `#` comments are supported. Existing variables win
/// unless `override_existing` is set. Returns `false` when the file does
/// not exist, which is not an error.
pub fn load_env(path: impl AsRef<Path>, override_existing: bool) -> Result<bool, ConfigError> {
    let path = path.as_ref();
    let result = if override_existing {
        dotenvy::from_path_override(path)
    } else {
        dotenvy::from_path(path)
    };

    match result {
        Ok(()) => {
            debug!(path = %path.display(), override_existing, "Loaded env file");
            Ok(true)
        }
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(ConfigError::EnvFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Load the dotenv file and build a [`Config`] from the resulting environment.
///
/// A malformed env file is reported and skipped; configuration falls back
/// to whatever the process environment provides.
pub fn load_config(path: impl AsRef<Path>, override_existing: bool) -> Config {
    if let Err(e) = load_env(path, override_existing) {
        warn!("{e}");
    }
    Config::from_env()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ENV_LOCK, EnvVarGuard};
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::PoisonError;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::default();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.model_id, DEFAULT_MODEL_ID);
        assert_eq!(config.model_path, DEFAULT_MODEL_PATH);
        assert_eq!(config.model_context, DEFAULT_CONTEXT_SIZE);
        assert_eq!(config.model_threads, None);
        assert_eq!(config.model_gpu_layers, None);
        assert_eq!(config.llama_server_path, None);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            (keys::HOST, "0.0.0.0"),
            (keys::PORT, "9000"),
            (keys::MODEL_ID, "local/test"),
            (keys::MODEL_PATH, "~/models/test.gguf"),
            (keys::CONTEXT_SIZE, "2048"),
            (keys::THREADS, "8"),
            (keys::GPU_LAYERS, "-1"),
            (keys::LLAMA_SERVER_PATH, "/opt/llama/llama-server"),
        ]));

        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.model_id, "local/test");
        assert_eq!(config.model_path, "~/models/test.gguf");
        assert_eq!(config.model_context, 2048);
        assert_eq!(config.model_threads, Some(8));
        assert_eq!(config.model_gpu_layers, Some(-1));
        assert_eq!(
            config.llama_server_path,
            Some(PathBuf::from("/opt/llama/llama-server"))
        );
    }

    #[test]
    fn empty_and_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            (keys::HOST, ""),
            (keys::PORT, "not-a-port"),
            (keys::CONTEXT_SIZE, "big"),
            (keys::THREADS, "many"),
            (keys::GPU_LAYERS, ""),
        ]));

        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.model_context, DEFAULT_CONTEXT_SIZE);
        assert_eq!(config.model_threads, None);
        assert_eq!(config.model_gpu_layers, None);
    }

    #[test]
    fn missing_env_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_env(dir.path().join("absent.env"), false).unwrap();
        assert!(!loaded);
    }

    #[test]
    fn env_file_respects_existing_variables_unless_overridden() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# comment line").unwrap();
        writeln!(file, "LMGATE_TEST_QUOTED=\"hello world\"").unwrap();
        writeln!(file, "LMGATE_TEST_PRESET=from-file").unwrap();
        drop(file);

        let _lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let _preset = EnvVarGuard::set("LMGATE_TEST_PRESET", "from-process");
        let _quoted = EnvVarGuard::remove("LMGATE_TEST_QUOTED");

        assert!(load_env(&path, false).unwrap());
        assert_eq!(env::var("LMGATE_TEST_QUOTED").unwrap(), "hello world");
        assert_eq!(env::var("LMGATE_TEST_PRESET").unwrap(), "from-process");

        assert!(load_env(&path, true).unwrap());
        assert_eq!(env::var("LMGATE_TEST_PRESET").unwrap(), "from-file");
    }
}
