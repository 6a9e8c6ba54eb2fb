//! UseCase: アイドル状態の Room の破棄
//!
//! 既定では無効です。TTL が設定されたときだけサーバーが定期的に実行します。

use std::{sync::Arc, time::Duration};

use kanvas_shared::time::Clock;

use crate::domain::{RoomId, RoomRepository, Timestamp};

/// アイドル Room 破棄のユースケース
pub struct ReapIdleRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
    idle_ttl: Duration,
}

impl ReapIdleRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>, idle_ttl: Duration) -> Self {
        Self {
            repository,
            clock,
            idle_ttl,
        }
    }

    /// メンバーがおらず TTL を超えて活動のない Room を破棄する
    pub async fn execute(&self) -> Vec<RoomId> {
        let ttl_millis = i64::try_from(self.idle_ttl.as_millis()).unwrap_or(i64::MAX);
        let cutoff = Timestamp::new(self.clock.now_millis().saturating_sub(ttl_millis));

        let removed = self.repository.remove_idle_rooms(cutoff).await;
        if !removed.is_empty() {
            tracing::info!("Reaped {} idle room(s): {:?}", removed.len(), removed);
        }
        removed
    }
}
