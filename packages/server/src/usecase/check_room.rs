//! UseCase: Room の存在確認と参加前の事前確認
//!
//! リアルタイム接続を張る前に HTTP から呼ばれます。

use std::sync::Arc;

use crate::domain::{DrawingEvent, RoomId, RoomRepository};

use super::error::PrecheckError;

/// Room 確認のユースケース
pub struct CheckRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl CheckRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// Room が存在するか。形式が不正な ID は存在しない扱い。
    pub async fn exists(&self, room_id: &str) -> bool {
        match RoomId::new(room_id.to_string()) {
            Ok(room_id) => self.repository.exists(&room_id).await,
            Err(_) => false,
        }
    }

    /// 参加前の事前確認。成功時はその時点の履歴を返す。
    pub async fn precheck(&self, room_id: &str) -> Result<Vec<DrawingEvent>, PrecheckError> {
        let room_id = RoomId::new(room_id.to_string())
            .map_err(|_| PrecheckError::InvalidRoomId(room_id.to_string()))?;
        let room = self
            .repository
            .get_room(&room_id)
            .await
            .ok_or_else(|| PrecheckError::RoomNotFound(room_id.to_string()))?;

        Ok(room.history().to_vec())
    }
}
