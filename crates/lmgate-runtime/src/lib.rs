//! llama.cpp runtime for lmgate.
//!
//! Implements the [`lmgate_core::InferenceEngine`] port by supervising a
//! local `llama-server` process and talking to it over loopback HTTP.

#![deny(unsafe_code)]

pub mod llama;

pub use llama::{LlamaServerClient, LlamaServerEngine, LlamaServerModel};
