//! llama-server supervision.
//!
//! - [`detect`]: locating the `llama-server` binary
//! - [`args`]: command line construction from model parameters
//! - [`client`]: HTTP calls against a running server
//! - [`engine`]: the [`InferenceEngine`](lmgate_core::InferenceEngine) implementation

pub mod args;
pub mod client;
pub mod detect;
pub mod engine;
mod ports;

pub use client::{LlamaServerClient, capability_kind_from_props};
pub use detect::{LLAMA_SERVER_BINARY, locate_llama_server};
pub use engine::{DEFAULT_STARTUP_TIMEOUT, LlamaServerEngine, LlamaServerModel};
