//! Command-line entry point for lmgate.
//!
//! Argument parsing and config overrides live here so they can be tested;
//! `main.rs` only wires the pieces together.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use anyhow as _;
use lmgate_axum as _;
use lmgate_runtime as _;
use tokio as _;
use tracing as _;
use tracing_subscriber as _;

pub mod parser;

pub use parser::Cli;
