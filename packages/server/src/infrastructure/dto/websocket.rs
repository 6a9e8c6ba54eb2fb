//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by its `type` field.

use serde::{Deserialize, Serialize};

use crate::domain::entity::{DEFAULT_COLOR, DEFAULT_LINE_WIDTH, DEFAULT_TOOL};

/// Drawing event kind on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DrawingKindDto {
    #[serde(alias = "beginStroke")]
    StartDrawing,
    #[serde(alias = "point")]
    Drawing,
    #[serde(alias = "endStroke")]
    StopDrawing,
    Clear,
}

/// Drawing event on the wire
///
/// Inbound, `userId`, `userName` and `timestamp` are ignored; the server
/// stamps its own values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingEventDto {
    #[serde(rename = "type")]
    pub kind: DrawingKindDto,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_y: Option<f64>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_line_width")]
    pub line_width: u32,
    #[serde(default = "default_tool")]
    pub tool: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub timestamp: i64,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_line_width() -> u32 {
    DEFAULT_LINE_WIDTH
}

fn default_tool() -> String {
    DEFAULT_TOOL.to_string()
}

/// Member presence on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub connection_id: String,
    pub user_name: String,
    /// Unix timestamp (milliseconds)
    pub joined_at: i64,
    pub is_drawing: bool,
}

/// Client → server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    Join {
        room_id: String,
        #[serde(default)]
        display_name: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Leave {
        #[serde(default)]
        room_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    SendDrawingEvent {
        room_id: String,
        event: DrawingEventDto,
    },
    #[serde(rename_all = "camelCase")]
    ClearCanvas { room_id: String },
}

/// Server → client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    Connected { connection_id: String },
    JoinError { reason: String },
    DrawingHistory { events: Vec<DrawingEventDto> },
    UsersUpdated { users: Vec<MemberDto> },
    #[serde(rename_all = "camelCase")]
    UserJoined {
        connection_id: String,
        user_name: String,
    },
    #[serde(rename_all = "camelCase")]
    UserLeft { connection_id: String },
    #[serde(rename_all = "camelCase")]
    UserStartedDrawing {
        user_id: String,
        user_name: String,
        tool: String,
    },
    #[serde(rename_all = "camelCase")]
    UserStoppedDrawing { user_id: String, user_name: String },
    ReceiveDrawingEvent { event: DrawingEventDto },
    ClearCanvas,
    DrawingError { reason: String },
    Error { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join_message() {
        // テスト項目: join メッセージが camelCase のフィールドで解釈される
        // given (前提条件):
        let raw = r#"{"type":"join","roomId":"A1B2C3","displayName":"alice"}"#;

        // when (操作):
        let message: ClientMessage = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            message,
            ClientMessage::Join {
                room_id: "A1B2C3".to_string(),
                display_name: Some("alice".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_drawing_event_applies_defaults() {
        // テスト項目: 省略されたスタイル項目には既定値が入り、別名の種別も受け付ける
        // given (前提条件):
        let raw = r#"{"type":"sendDrawingEvent","roomId":"A1B2C3","event":{"type":"point","x":10,"y":20}}"#;

        // when (操作):
        let message: ClientMessage = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        let ClientMessage::SendDrawingEvent { room_id, event } = message else {
            panic!("unexpected message: {message:?}");
        };
        assert_eq!(room_id, "A1B2C3");
        assert_eq!(event.kind, DrawingKindDto::Drawing);
        assert_eq!((event.x, event.y), (10.0, 20.0));
        assert_eq!(event.tool, "pen");
        assert_eq!(event.color, "#000000");
        assert_eq!(event.line_width, 2);
        assert_eq!(event.start_x, None);
    }

    #[test]
    fn test_parse_leave_without_room_id() {
        // テスト項目: roomId を省略した leave を受け付ける
        // when (操作):
        let message: ClientMessage = serde_json::from_str(r#"{"type":"leave"}"#).unwrap();

        // then (期待する結果):
        assert_eq!(message, ClientMessage::Leave { room_id: None });
    }

    #[test]
    fn test_unknown_message_type_is_rejected() {
        // テスト項目: 未知の type は解釈エラーになる
        // when (操作):
        let result = serde_json::from_str::<ClientMessage>(r#"{"type":"dance","roomId":"A1B2C3"}"#);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_server_messages() {
        // テスト項目: サーバーメッセージが type タグ付きでシリアライズされる
        // given (前提条件):
        let clear = ServerMessage::ClearCanvas;
        let joined = ServerMessage::UserJoined {
            connection_id: "c-1".to_string(),
            user_name: "alice".to_string(),
        };

        // when (操作):
        let clear_json = serde_json::to_value(&clear).unwrap();
        let joined_json = serde_json::to_value(&joined).unwrap();

        // then (期待する結果):
        assert_eq!(clear_json, serde_json::json!({"type": "clearCanvas"}));
        assert_eq!(
            joined_json,
            serde_json::json!({"type": "userJoined", "connectionId": "c-1", "userName": "alice"})
        );
    }
}
