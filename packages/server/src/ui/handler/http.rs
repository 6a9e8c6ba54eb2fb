//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::{
        http::{CreateRoomResponse, JoinRoomRequest, JoinRoomResponse, RoomDetailDto, RoomSummaryDto},
        websocket::DrawingEventDto,
    },
    ui::state::AppState,
    usecase::{GetRoomDetailError, PrecheckError},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create a new empty room
pub async fn create_room(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CreateRoomResponse>, (StatusCode, Json<serde_json::Value>)> {
    match state.create_room_usecase.execute().await {
        Ok(room_id) => Ok(Json(CreateRoomResponse {
            room_id: room_id.into_string(),
            message: "Room created successfully".to_string(),
        })),
        Err(e) => {
            tracing::error!("{}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"message": e.reason()})),
            ))
        }
    }
}

/// Whether a room exists (`true` / `false`)
pub async fn room_exists(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Json<bool> {
    Json(state.check_room_usecase.exists(&room_id).await)
}

/// Pre-join check used before opening the realtime channel
pub async fn join_room_precheck(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JoinRoomRequest>,
) -> (StatusCode, Json<JoinRoomResponse>) {
    match state.check_room_usecase.precheck(&request.room_id).await {
        Ok(history) => (
            StatusCode::OK,
            Json(JoinRoomResponse {
                success: true,
                message: "Room found".to_string(),
                drawing_history: Some(history.iter().map(DrawingEventDto::from).collect()),
            }),
        ),
        Err(e) => {
            let status = match e {
                PrecheckError::InvalidRoomId(_) => StatusCode::BAD_REQUEST,
                PrecheckError::RoomNotFound(_) => StatusCode::NOT_FOUND,
            };
            (
                status,
                Json(JoinRoomResponse {
                    success: false,
                    message: e.reason(),
                    drawing_history: None,
                }),
            )
        }
    }
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok(room) => Ok(Json(RoomDetailDto::from(&room))),
        Err(GetRoomDetailError::InvalidRoomId(_)) => Err(StatusCode::BAD_REQUEST),
        Err(GetRoomDetailError::RoomNotFound(_)) => Err(StatusCode::NOT_FOUND),
    }
}
