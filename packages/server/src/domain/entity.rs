//! Entity 定義
//!
//! - `Room`: メンバーと描画履歴を持つ集約。1 つの Room への変更は必ず
//!   Room 単位の排他区間の中で行われる（`RoomRepository::find_room` 参照）。
//! - `Member`: Room に参加中の接続のプレゼンス情報
//! - `DrawingEvent`: サーバーで送信者と時刻を刻印した描画イベント
//! - `Session`: 接続ごとの状態機械（未参加 / 参加中 / 切断済み）

use super::{
    error::{RoomError, ValueObjectError},
    value_object::{ConnectionId, DisplayName, RoomId, Timestamp},
};

pub const DEFAULT_TOOL: &str = "pen";
pub const DEFAULT_COLOR: &str = "#000000";
pub const DEFAULT_LINE_WIDTH: u32 = 2;
pub const MIN_LINE_WIDTH: u32 = 1;
pub const MAX_LINE_WIDTH: u32 = 200;
pub const STYLE_FIELD_MAX_LENGTH: usize = 32;

/// Presence record of a connection inside a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    pub joined_at: Timestamp,
    pub is_drawing: bool,
}

impl Member {
    pub fn new(connection_id: ConnectionId, display_name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            connection_id,
            display_name,
            joined_at,
            is_drawing: false,
        }
    }
}

/// Result of adding a connection to a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipChange {
    /// The connection was not a member before
    Added(Member),
    /// The connection was already a member; its display name was refreshed
    Refreshed(Member),
}

impl MembershipChange {
    pub fn member(&self) -> &Member {
        match self {
            Self::Added(member) | Self::Refreshed(member) => member,
        }
    }
}

/// Kind of a drawing event; the only part of the payload the server interprets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawingKind {
    BeginStroke,
    Point,
    EndStroke,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Result<Self, ValueObjectError> {
        if !x.is_finite() {
            return Err(ValueObjectError::NonFiniteCoordinate("x"));
        }
        if !y.is_finite() {
            return Err(ValueObjectError::NonFiniteCoordinate("y"));
        }
        Ok(Self { x, y })
    }
}

/// Opaque drawing payload shared by every kind of event
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeGeometry {
    pub position: Point,
    /// Anchor for shape tools (rectangle, circle, line)
    pub anchor: Option<Point>,
    pub tool: String,
    pub color: String,
    pub line_width: u32,
}

impl StrokeGeometry {
    pub fn new(
        position: Point,
        anchor: Option<Point>,
        tool: String,
        color: String,
        line_width: u32,
    ) -> Result<Self, ValueObjectError> {
        if !(MIN_LINE_WIDTH..=MAX_LINE_WIDTH).contains(&line_width) {
            return Err(ValueObjectError::LineWidthOutOfRange {
                value: line_width,
                min: MIN_LINE_WIDTH,
                max: MAX_LINE_WIDTH,
            });
        }
        validate_style_field("tool", &tool)?;
        validate_style_field("color", &color)?;

        Ok(Self {
            position,
            anchor,
            tool,
            color,
            line_width,
        })
    }
}

impl Default for StrokeGeometry {
    fn default() -> Self {
        Self {
            position: Point { x: 0.0, y: 0.0 },
            anchor: None,
            tool: DEFAULT_TOOL.to_string(),
            color: DEFAULT_COLOR.to_string(),
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

fn validate_style_field(field: &'static str, value: &str) -> Result<(), ValueObjectError> {
    let length = value.chars().count();
    if length == 0 || length > STYLE_FIELD_MAX_LENGTH {
        return Err(ValueObjectError::InvalidStyleField {
            field,
            max: STYLE_FIELD_MAX_LENGTH,
        });
    }
    Ok(())
}

/// Drawing event as submitted by a client (sender data is never trusted)
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingRequest {
    pub kind: DrawingKind,
    pub geometry: StrokeGeometry,
}

impl DrawingRequest {
    pub fn new(kind: DrawingKind, geometry: StrokeGeometry) -> Self {
        Self { kind, geometry }
    }

    pub fn clear() -> Self {
        Self::new(DrawingKind::Clear, StrokeGeometry::default())
    }
}

/// Drawing event accepted by the server
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingEvent {
    pub kind: DrawingKind,
    pub geometry: StrokeGeometry,
    pub sender_id: ConnectionId,
    pub sender_name: DisplayName,
    pub timestamp: Timestamp,
}

/// Room aggregate
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub created_at: Timestamp,
    members: Vec<Member>,
    history: Vec<DrawingEvent>,
    last_active_at: Timestamp,
    disposed: bool,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            created_at,
            members: Vec::new(),
            history: Vec::new(),
            last_active_at: created_at,
            disposed: false,
        }
    }

    /// Members in join order
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, connection_id: &ConnectionId) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| &m.connection_id == connection_id)
    }

    pub fn is_member(&self, connection_id: &ConnectionId) -> bool {
        self.member(connection_id).is_some()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members
            .iter()
            .map(|m| m.connection_id.clone())
            .collect()
    }

    pub fn member_ids_except(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.members
            .iter()
            .filter(|m| &m.connection_id != exclude)
            .map(|m| m.connection_id.clone())
            .collect()
    }

    /// Drawing history in acceptance order
    pub fn history(&self) -> &[DrawingEvent] {
        &self.history
    }

    pub fn last_active_at(&self) -> Timestamp {
        self.last_active_at
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Add a member, or refresh the display name of an existing one.
    ///
    /// A refreshed member keeps its `joined_at` and `is_drawing`.
    pub fn upsert_member(
        &mut self,
        connection_id: ConnectionId,
        display_name: DisplayName,
        now: Timestamp,
    ) -> MembershipChange {
        self.touch(now);

        if let Some(existing) = self
            .members
            .iter_mut()
            .find(|m| m.connection_id == connection_id)
        {
            existing.display_name = display_name;
            return MembershipChange::Refreshed(existing.clone());
        }

        let member = Member::new(connection_id, display_name, now);
        self.members.push(member.clone());
        MembershipChange::Added(member)
    }

    pub fn remove_member(&mut self, connection_id: &ConnectionId, now: Timestamp) -> Option<Member> {
        let index = self
            .members
            .iter()
            .position(|m| &m.connection_id == connection_id)?;
        self.touch(now);
        Some(self.members.remove(index))
    }

    pub fn set_drawing(
        &mut self,
        connection_id: &ConnectionId,
        is_drawing: bool,
    ) -> Result<(), RoomError> {
        let member = self
            .members
            .iter_mut()
            .find(|m| &m.connection_id == connection_id)
            .ok_or_else(|| RoomError::MemberNotFound(connection_id.as_str().to_string()))?;
        member.is_drawing = is_drawing;
        Ok(())
    }

    /// Stamp a request with its sender and time, then append it to the history.
    ///
    /// The stamp never goes below the previous event's stamp, so the history
    /// stays non-decreasing even if the wall clock steps back.
    pub fn append_event(
        &mut self,
        request: DrawingRequest,
        sender_id: &ConnectionId,
        now: Timestamp,
    ) -> Result<DrawingEvent, RoomError> {
        if request.kind == DrawingKind::Clear {
            return Err(RoomError::ClearNotStorable);
        }
        let sender_name = self
            .member(sender_id)
            .map(|m| m.display_name.clone())
            .ok_or_else(|| RoomError::MemberNotFound(sender_id.as_str().to_string()))?;

        let timestamp = match self.history.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };

        let event = DrawingEvent {
            kind: request.kind,
            geometry: request.geometry,
            sender_id: sender_id.clone(),
            sender_name,
            timestamp,
        };
        self.history.push(event.clone());
        self.touch(now);

        Ok(event)
    }

    /// Truncate the history, returning how many events were dropped
    pub fn clear_history(&mut self, now: Timestamp) -> usize {
        let cleared = self.history.len();
        self.history.clear();
        self.touch(now);
        cleared
    }

    /// Empty and untouched since `cutoff`
    pub fn is_idle_since(&self, cutoff: Timestamp) -> bool {
        self.members.is_empty() && self.last_active_at <= cutoff
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    fn touch(&mut self, now: Timestamp) {
        if now > self.last_active_at {
            self.last_active_at = now;
        }
    }
}

/// Connection lifecycle as seen by the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unjoined,
    Joined(RoomId),
    /// Terminal
    Disconnected,
}

/// Per-connection session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    connection_id: ConnectionId,
    state: SessionState,
}

impl Session {
    pub fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            state: SessionState::Unjoined,
        }
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn joined_room(&self) -> Option<&RoomId> {
        match &self.state {
            SessionState::Joined(room_id) => Some(room_id),
            _ => None,
        }
    }

    pub fn is_disconnected(&self) -> bool {
        self.state == SessionState::Disconnected
    }

    /// No effect once disconnected
    pub fn mark_joined(&mut self, room_id: RoomId) {
        if !self.is_disconnected() {
            self.state = SessionState::Joined(room_id);
        }
    }

    /// Returns the room the session was joined to, if any
    pub fn mark_unjoined(&mut self) -> Option<RoomId> {
        match std::mem::replace(&mut self.state, SessionState::Unjoined) {
            SessionState::Joined(room_id) => Some(room_id),
            SessionState::Unjoined => None,
            SessionState::Disconnected => {
                self.state = SessionState::Disconnected;
                None
            }
        }
    }

    /// Returns the room the session was joined to, if any
    pub fn mark_disconnected(&mut self) -> Option<RoomId> {
        match std::mem::replace(&mut self.state, SessionState::Disconnected) {
            SessionState::Joined(room_id) => Some(room_id),
            _ => None,
        }
    }
}
