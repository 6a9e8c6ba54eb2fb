//! UI layer: axum router, WebSocket connection loop and HTTP handlers.

pub mod config;
pub mod handler;
pub mod server;
mod signal;
pub mod state;

pub use config::ServerConfig;
pub use server::{Server, ServerError};
pub use state::AppState;
