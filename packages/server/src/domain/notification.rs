//! Outbound notifications produced by the coordinator.
//!
//! The transport decides how a notification is encoded; the domain only
//! decides what is sent and to whom.

use super::{
    entity::{DrawingEvent, Member},
    value_object::{ConnectionId, DisplayName},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Sent once to a freshly accepted connection
    Connected { connection_id: ConnectionId },
    JoinError { reason: String },
    /// History snapshot taken at join time
    DrawingHistory { events: Vec<DrawingEvent> },
    UsersUpdated { members: Vec<Member> },
    UserJoined {
        connection_id: ConnectionId,
        display_name: DisplayName,
    },
    UserLeft { connection_id: ConnectionId },
    UserStartedDrawing {
        connection_id: ConnectionId,
        display_name: DisplayName,
        tool: String,
    },
    UserStoppedDrawing {
        connection_id: ConnectionId,
        display_name: DisplayName,
    },
    ReceiveDrawingEvent { event: DrawingEvent },
    ClearCanvas,
    DrawingError { reason: String },
    /// The inbound frame could not be understood at all
    RequestError { reason: String },
}

impl Notification {
    /// Wire name, used for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::JoinError { .. } => "joinError",
            Self::DrawingHistory { .. } => "drawingHistory",
            Self::UsersUpdated { .. } => "usersUpdated",
            Self::UserJoined { .. } => "userJoined",
            Self::UserLeft { .. } => "userLeft",
            Self::UserStartedDrawing { .. } => "userStartedDrawing",
            Self::UserStoppedDrawing { .. } => "userStoppedDrawing",
            Self::ReceiveDrawingEvent { .. } => "receiveDrawingEvent",
            Self::ClearCanvas => "clearCanvas",
            Self::DrawingError { .. } => "drawingError",
            Self::RequestError { .. } => "error",
        }
    }
}
