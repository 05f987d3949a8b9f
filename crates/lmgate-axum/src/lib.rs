//! Axum HTTP adapter for lmgate.
//!
//! Requests enter through a single fallback handler, the [`dispatch`]er,
//! which looks the exact `(method, path)` pair up in a [`Router`] and
//! hands the whole request to the matched [`RouteHandler`].
//!
//! | Method | Path     | Handler |
//! |--------|----------|---------|
//! | GET    | `/hello` | [`handlers::hello::HelloHandler`] |
//! | POST   | `/chat`  | [`handlers::chat::ChatPipeline`] |

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for the unit test build
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod json_io;
pub mod routes;

// Re-export primary types
pub use bootstrap::{AxumContext, bootstrap, serve, start_server};
pub use dispatch::{build_app, dispatch};
pub use error::ChatError;
pub use routes::{Handler, RouteHandler, Router, create_router};
