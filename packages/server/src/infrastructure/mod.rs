//! Infrastructure layer: concrete registry, transport adapter and wire formats.

pub mod dto;
pub mod message_pusher;
pub mod repository;
