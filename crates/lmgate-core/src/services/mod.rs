//! Application services built on top of the ports.

mod generation;

pub use generation::{GenerationError, INFERENCE_ERROR_MESSAGE, SYSTEM_PROMPT, generate_reply};
