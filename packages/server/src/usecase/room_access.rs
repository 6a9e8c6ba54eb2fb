//! 描画系操作に共通する Room の取得とメンバー確認

use tokio::sync::OwnedMutexGuard;

use crate::domain::{Room, RoomId, RoomRepository, Session};

use super::error::DrawingError;

/// 呼び出し元がメンバーである Room をロックして返す
///
/// 検証はすべてロック取得の前後で完了し、失敗時は Room を一切変更しない。
pub(crate) async fn lock_joined_room(
    repository: &dyn RoomRepository,
    session: &Session,
    raw_room_id: &str,
) -> Result<OwnedMutexGuard<Room>, DrawingError> {
    if session.is_disconnected() {
        return Err(DrawingError::InvalidRequest("Session is closed".to_string()));
    }
    let room_id = RoomId::new(raw_room_id.to_string())
        .map_err(|e| DrawingError::InvalidRequest(e.to_string()))?;

    let shared = repository
        .find_room(&room_id)
        .await
        .ok_or_else(|| DrawingError::RoomNotFound(room_id.to_string()))?;
    let room = shared.lock_owned().await;

    if room.is_disposed() {
        return Err(DrawingError::RoomNotFound(room_id.to_string()));
    }
    if !room.is_member(session.connection_id()) {
        return Err(DrawingError::InvalidRequest(format!(
            "Not a member of room '{}'",
            room_id
        )));
    }

    Ok(room)
}
