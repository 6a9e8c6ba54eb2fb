//! UseCase: Room への参加
//!
//! ## 処理の流れ
//!
//! 1. Room ID と表示名を検証する（失敗しても Session は変わらない）
//! 2. 別の Room に参加中なら、先にその Room から退出する
//! 3. Room のロック内でメンバーを追加（再参加なら表示名を更新）し、
//!    呼び出し元に履歴のスナップショット、Room 全体に usersUpdated、
//!    呼び出し元以外に userJoined を送る
//!
//! 失敗時は呼び出し元にだけ joinError を返します。

use std::sync::Arc;

use kanvas_shared::time::Clock;

use crate::domain::{
    DisplayName, MembershipChange, MessagePusher, Notification, RoomId, RoomRepository, Session,
    Timestamp,
};

use super::{broadcaster::RoomBroadcaster, error::JoinRoomError, leave_room::LeaveRoomUseCase};

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    broadcaster: RoomBroadcaster,
    /// 別 Room への参加時の暗黙の退出
    leave_room: LeaveRoomUseCase,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            leave_room: LeaveRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            repository,
            broadcaster: RoomBroadcaster::new(message_pusher),
            clock,
        }
    }

    /// Room に参加する。失敗時は呼び出し元に joinError を送ってからエラーを返す。
    ///
    /// # Arguments
    ///
    /// * `session` - 呼び出し元の Session
    /// * `room_id` - 参加する Room の ID（未検証）
    /// * `display_name` - 表示名（省略時はプレースホルダー）
    pub async fn execute(
        &self,
        session: &mut Session,
        room_id: String,
        display_name: Option<String>,
    ) -> Result<MembershipChange, JoinRoomError> {
        let result = self.join(session, room_id, display_name).await;

        if let Err(e) = &result {
            tracing::info!("Join rejected for '{}': {}", session.connection_id(), e);
            self.broadcaster
                .to_caller(
                    session.connection_id(),
                    &Notification::JoinError { reason: e.reason() },
                )
                .await;
        }

        result
    }

    async fn join(
        &self,
        session: &mut Session,
        room_id: String,
        display_name: Option<String>,
    ) -> Result<MembershipChange, JoinRoomError> {
        if session.is_disconnected() {
            return Err(JoinRoomError::InvalidRequest("Session is closed".to_string()));
        }
        let room_id =
            RoomId::new(room_id).map_err(|e| JoinRoomError::InvalidRequest(e.to_string()))?;
        let display_name = DisplayName::new(display_name.unwrap_or_default())
            .map_err(|e| JoinRoomError::InvalidRequest(e.to_string()))?;

        let shared = self
            .repository
            .find_room(&room_id)
            .await
            .ok_or_else(|| JoinRoomError::RoomNotFound(room_id.to_string()))?;

        // 旧 Room のロックは新 Room のロックより先に手放す
        if session.joined_room().is_some_and(|current| current != &room_id) {
            self.leave_room.execute(session, None).await;
        }

        let mut room = shared.lock().await;
        if room.is_disposed() {
            return Err(JoinRoomError::RoomNotFound(room_id.to_string()));
        }

        let connection_id = session.connection_id().clone();
        let now = Timestamp::new(self.clock.now_millis());
        let change = room.upsert_member(connection_id.clone(), display_name, now);
        session.mark_joined(room_id.clone());

        tracing::info!(
            "'{}' joined room '{}' as '{}' ({} member(s), {} event(s) in history)",
            connection_id,
            room_id,
            change.member().display_name.as_str(),
            room.member_count(),
            room.history().len()
        );

        self.broadcaster
            .to_caller(
                &connection_id,
                &Notification::DrawingHistory {
                    events: room.history().to_vec(),
                },
            )
            .await;
        self.broadcaster
            .to_room(
                &room,
                &Notification::UsersUpdated {
                    members: room.members().to_vec(),
                },
            )
            .await;
        self.broadcaster
            .to_others(
                &room,
                &connection_id,
                &Notification::UserJoined {
                    connection_id: connection_id.clone(),
                    display_name: change.member().display_name.clone(),
                },
            )
            .await;

        Ok(change)
    }
}
