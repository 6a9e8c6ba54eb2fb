//! UseCase: Room の作成

use std::sync::Arc;

use kanvas_shared::time::Clock;

use crate::domain::{RoomId, RoomRepository, Timestamp};

use super::error::CreateRoomError;

/// Room 作成のユースケース
pub struct CreateRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 未使用の ID で空の Room を作成する
    pub async fn execute(&self) -> Result<RoomId, CreateRoomError> {
        let created_at = Timestamp::new(self.clock.now_millis());
        let room_id = self
            .repository
            .create_room(created_at)
            .await
            .map_err(|e| CreateRoomError::Internal(e.to_string()))?;

        tracing::info!("Room '{}' created", room_id);
        Ok(room_id)
    }
}
