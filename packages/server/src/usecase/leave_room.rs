//! UseCase: Room からの退出
//!
//! 明示的な leave のほか、別 Room への join と切断からも呼ばれます。
//! 退出は失敗しません（未参加での leave は何もしない）。

use std::sync::Arc;

use kanvas_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, Notification, RoomId, RoomRepository, Session, Timestamp,
};

use super::broadcaster::RoomBroadcaster;

/// Room 退出のユースケース
pub struct LeaveRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    broadcaster: RoomBroadcaster,
    clock: Arc<dyn Clock>,
}

impl LeaveRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            broadcaster: RoomBroadcaster::new(message_pusher),
            clock,
        }
    }

    /// Session が参加中の Room から退出する
    ///
    /// `room_id` が省略されたか参加中の Room と一致する場合だけ退出し、
    /// 一致しない・不正な ID は何もしない。
    ///
    /// # Returns
    ///
    /// 退出した Room の ID（退出しなかった場合は `None`）
    pub async fn execute(&self, session: &mut Session, room_id: Option<String>) -> Option<RoomId> {
        if let Some(raw) = room_id {
            let matches = match (RoomId::new(raw.clone()), session.joined_room()) {
                (Ok(requested), Some(current)) => &requested == current,
                _ => false,
            };
            if !matches {
                tracing::debug!(
                    "Ignoring leave of '{}' from '{}' (joined: {:?})",
                    raw,
                    session.connection_id(),
                    session.joined_room().map(RoomId::as_str)
                );
                return None;
            }
        }

        let room_id = session.mark_unjoined()?;
        self.remove_member(session.connection_id(), &room_id).await;
        Some(room_id)
    }

    /// メンバーを Room から外し、残りのメンバーに通知する
    pub(crate) async fn remove_member(&self, connection_id: &ConnectionId, room_id: &RoomId) {
        let Some(shared) = self.repository.find_room(room_id).await else {
            tracing::debug!("Room '{}' is already gone; nothing to leave", room_id);
            return;
        };
        let mut room = shared.lock().await;
        if room.is_disposed() {
            return;
        }

        let now = Timestamp::new(self.clock.now_millis());
        if room.remove_member(connection_id, now).is_none() {
            return;
        }
        tracing::info!(
            "'{}' left room '{}' ({} member(s) remaining)",
            connection_id,
            room_id,
            room.member_count()
        );

        self.broadcaster
            .to_room(
                &room,
                &Notification::UsersUpdated {
                    members: room.members().to_vec(),
                },
            )
            .await;
        self.broadcaster
            .to_room(
                &room,
                &Notification::UserLeft {
                    connection_id: connection_id.clone(),
                },
            )
            .await;
    }
}
