//! UseCase layer errors.
//!
//! `reason()` は呼び出し元の接続にだけ返す短い説明文です。

use thiserror::Error;

/// Join 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error("Invalid join request: {0}")]
    InvalidRequest(String),
}

impl JoinRoomError {
    pub fn reason(&self) -> String {
        match self {
            Self::RoomNotFound(_) => "Room not found".to_string(),
            Self::InvalidRequest(detail) => detail.clone(),
        }
    }
}

/// 描画操作（描画イベント送信・キャンバスクリア）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawingError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error("Invalid drawing request: {0}")]
    InvalidRequest(String),

    #[error("Internal error while drawing: {0}")]
    Internal(String),
}

impl DrawingError {
    pub fn reason(&self) -> String {
        match self {
            Self::RoomNotFound(_) => "Room not found".to_string(),
            Self::InvalidRequest(detail) => detail.clone(),
            Self::Internal(_) => "Failed to process drawing event".to_string(),
        }
    }
}

/// Room 作成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("Failed to create room: {0}")]
    Internal(String),
}

impl CreateRoomError {
    pub fn reason(&self) -> String {
        "Failed to create room".to_string()
    }
}

/// Join 前の事前確認のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrecheckError {
    #[error("Invalid room ID: {0}")]
    InvalidRoomId(String),

    #[error("Room '{0}' not found")]
    RoomNotFound(String),
}

impl PrecheckError {
    pub fn reason(&self) -> String {
        match self {
            Self::InvalidRoomId(_) => "Invalid room ID".to_string(),
            Self::RoomNotFound(_) => "Room not found".to_string(),
        }
    }
}

/// Room 詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Invalid room ID: {0}")]
    InvalidRoomId(String),

    #[error("Room '{0}' not found")]
    RoomNotFound(String),
}
