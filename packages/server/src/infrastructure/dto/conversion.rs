//! Conversion logic between DTOs and domain entities.

use kanvas_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    DrawingEvent, DrawingKind, DrawingRequest, Member, Notification, Point, Room,
    StrokeGeometry, ValueObjectError,
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl From<dto::DrawingKindDto> for DrawingKind {
    fn from(kind: dto::DrawingKindDto) -> Self {
        match kind {
            dto::DrawingKindDto::StartDrawing => Self::BeginStroke,
            dto::DrawingKindDto::Drawing => Self::Point,
            dto::DrawingKindDto::StopDrawing => Self::EndStroke,
            dto::DrawingKindDto::Clear => Self::Clear,
        }
    }
}

impl TryFrom<dto::DrawingEventDto> for DrawingRequest {
    type Error = ValueObjectError;

    /// Client-supplied sender fields and timestamp are dropped here.
    fn try_from(value: dto::DrawingEventDto) -> Result<Self, Self::Error> {
        let kind = DrawingKind::from(value.kind);
        if kind == DrawingKind::Clear {
            return Ok(Self::clear());
        }

        let position = Point::new(value.x, value.y)?;
        let anchor = match (value.start_x, value.start_y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)?),
            _ => None,
        };
        let geometry = StrokeGeometry::new(
            position,
            anchor,
            value.tool,
            value.color,
            value.line_width,
        )?;

        Ok(Self::new(kind, geometry))
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<DrawingKind> for dto::DrawingKindDto {
    fn from(kind: DrawingKind) -> Self {
        match kind {
            DrawingKind::BeginStroke => Self::StartDrawing,
            DrawingKind::Point => Self::Drawing,
            DrawingKind::EndStroke => Self::StopDrawing,
            DrawingKind::Clear => Self::Clear,
        }
    }
}

impl From<&DrawingEvent> for dto::DrawingEventDto {
    fn from(event: &DrawingEvent) -> Self {
        let geometry = &event.geometry;
        Self {
            kind: event.kind.into(),
            x: geometry.position.x,
            y: geometry.position.y,
            start_x: geometry.anchor.map(|p| p.x),
            start_y: geometry.anchor.map(|p| p.y),
            color: geometry.color.clone(),
            line_width: geometry.line_width,
            tool: geometry.tool.clone(),
            user_id: event.sender_id.as_str().to_string(),
            user_name: event.sender_name.as_str().to_string(),
            timestamp: event.timestamp.value(),
        }
    }
}

impl From<&Member> for dto::MemberDto {
    fn from(member: &Member) -> Self {
        Self {
            connection_id: member.connection_id.as_str().to_string(),
            user_name: member.display_name.as_str().to_string(),
            joined_at: member.joined_at.value(),
            is_drawing: member.is_drawing,
        }
    }
}

impl From<&Notification> for dto::ServerMessage {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::Connected { connection_id } => Self::Connected {
                connection_id: connection_id.as_str().to_string(),
            },
            Notification::JoinError { reason } => Self::JoinError {
                reason: reason.clone(),
            },
            Notification::DrawingHistory { events } => Self::DrawingHistory {
                events: events.iter().map(dto::DrawingEventDto::from).collect(),
            },
            Notification::UsersUpdated { members } => Self::UsersUpdated {
                users: members.iter().map(dto::MemberDto::from).collect(),
            },
            Notification::UserJoined {
                connection_id,
                display_name,
            } => Self::UserJoined {
                connection_id: connection_id.as_str().to_string(),
                user_name: display_name.as_str().to_string(),
            },
            Notification::UserLeft { connection_id } => Self::UserLeft {
                connection_id: connection_id.as_str().to_string(),
            },
            Notification::UserStartedDrawing {
                connection_id,
                display_name,
                tool,
            } => Self::UserStartedDrawing {
                user_id: connection_id.as_str().to_string(),
                user_name: display_name.as_str().to_string(),
                tool: tool.clone(),
            },
            Notification::UserStoppedDrawing {
                connection_id,
                display_name,
            } => Self::UserStoppedDrawing {
                user_id: connection_id.as_str().to_string(),
                user_name: display_name.as_str().to_string(),
            },
            Notification::ReceiveDrawingEvent { event } => Self::ReceiveDrawingEvent {
                event: event.into(),
            },
            Notification::ClearCanvas => Self::ClearCanvas,
            Notification::DrawingError { reason } => Self::DrawingError {
                reason: reason.clone(),
            },
            Notification::RequestError { reason } => Self::Error {
                reason: reason.clone(),
            },
        }
    }
}

impl From<&Member> for http::MemberDetailDto {
    fn from(member: &Member) -> Self {
        Self {
            connection_id: member.connection_id.as_str().to_string(),
            display_name: member.display_name.as_str().to_string(),
            joined_at: timestamp_to_rfc3339(member.joined_at.value()),
            is_drawing: member.is_drawing,
        }
    }
}

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            members: room
                .members()
                .iter()
                .map(|m| m.connection_id.as_str().to_string())
                .collect(),
            history_length: room.history().len(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            members: room.members().iter().map(http::MemberDetailDto::from).collect(),
            history_length: room.history().len(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
            last_active_at: timestamp_to_rfc3339(room.last_active_at().value()),
        }
    }
}
