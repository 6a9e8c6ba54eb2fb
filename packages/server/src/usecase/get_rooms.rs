//! UseCase: Room 一覧の取得

use std::sync::Arc;

use crate::domain::{Room, RoomRepository};

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 全 Room のスナップショットを作成順に返す
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.list_rooms().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::Timestamp, infrastructure::repository::InMemoryRoomRepository};

    #[tokio::test]
    async fn test_get_rooms_in_creation_order() {
        // テスト項目: Room 一覧は作成時刻順に並ぶ
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let later = repository.create_room(Timestamp::new(200)).await.unwrap();
        let earlier = repository.create_room(Timestamp::new(100)).await.unwrap();
        let usecase = GetRoomsUseCase::new(repository);

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        let ids: Vec<_> = rooms.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![earlier, later]);
    }
}
