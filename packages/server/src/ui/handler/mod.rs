//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{
    create_room, get_room_detail, get_rooms, health_check, join_room_precheck, room_exists,
};
pub use websocket::websocket_handler;
