//! Domain types shared by the HTTP adapter and the runtimes.

pub mod chat;
pub mod inference;

pub use chat::{ChatRequest, ChatValidationError};
pub use inference::{ChatMessage, SamplingParams};
