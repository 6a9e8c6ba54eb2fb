//! Kanvas collaborative drawing server library.
//!
//! Rooms hold a member list and an append-only drawing history. Connections join
//! a room over WebSocket, receive the history as a snapshot, then exchange drawing
//! events that are stamped by the server and fanned out to the room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
