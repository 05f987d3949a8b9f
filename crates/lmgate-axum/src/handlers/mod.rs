//! Route handlers.
//!
//! Each handler implements [`RouteHandler`](crate::routes::RouteHandler)
//! and writes its own response.

pub mod chat;
pub mod hello;
