//! HTTP server module.
//!
//! Plain HTTP only. The server includes:
//! - Graceful shutdown on SIGTERM/SIGINT with a bounded drain window

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
