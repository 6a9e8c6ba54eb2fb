//! Domain layer errors.

use thiserror::Error;

/// Value Object の生成・検証エラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueObjectError {
    #[error("Invalid room ID '{0}': expected 6 characters of A-Z or 0-9")]
    InvalidRoomId(String),

    #[error("Connection ID must not be empty")]
    EmptyConnectionId,

    #[error("Display name is too long ({length} characters, max {max})")]
    DisplayNameTooLong { length: usize, max: usize },

    #[error("Coordinate '{0}' must be a finite number")]
    NonFiniteCoordinate(&'static str),

    #[error("Line width {value} is out of range ({min}..={max})")]
    LineWidthOutOfRange { value: u32, min: u32, max: u32 },

    #[error("Field '{field}' must be 1 to {max} characters")]
    InvalidStyleField { field: &'static str, max: usize },
}

/// Room の状態遷移に関するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Connection '{0}' is not a member of this room")]
    MemberNotFound(String),

    #[error("Clear events are not stored in the drawing history")]
    ClearNotStorable,
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error("Could not find an unused room ID after {0} attempts")]
    IdSpaceExhausted(usize),
}

/// MessagePusher 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' is not registered")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),

    #[error("Failed to serialize notification: {0}")]
    Serialization(String),
}
