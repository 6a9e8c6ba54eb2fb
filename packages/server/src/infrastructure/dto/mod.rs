//! Data Transfer Objects (DTOs) for the drawing board.
//!
//! DTOs are organized by protocol:
//! - `websocket`: realtime channel messages
//! - `http`: HTTP API request/response bodies

pub mod conversion;
pub mod http;
pub mod websocket;
