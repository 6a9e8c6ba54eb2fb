//! UseCase: 切断処理
//!
//! 切断は参加中の Room からの退出と同じ副作用を持ちます。
//! クライアントが leave を送らずに切断しても、残りのメンバーのメンバー一覧は収束します。

use std::sync::Arc;

use kanvas_shared::time::Clock;

use crate::domain::{MessagePusher, RoomId, RoomRepository, Session};

use super::leave_room::LeaveRoomUseCase;

/// 切断のユースケース
pub struct DisconnectSessionUseCase {
    leave_room: LeaveRoomUseCase,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectSessionUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            leave_room: LeaveRoomUseCase::new(repository, message_pusher.clone(), clock),
            message_pusher,
        }
    }

    /// 切断を実行する。二度目以降の呼び出しは何もしない。
    ///
    /// # Returns
    ///
    /// 切断時に参加していた Room の ID
    pub async fn execute(&self, session: &mut Session) -> Option<RoomId> {
        if session.is_disconnected() {
            return None;
        }

        let left = session.mark_disconnected();
        if let Some(room_id) = &left {
            self.leave_room
                .remove_member(session.connection_id(), room_id)
                .await;
        }
        self.message_pusher
            .unregister_client(session.connection_id())
            .await;

        tracing::info!(
            "Connection '{}' closed (was in room: {})",
            session.connection_id(),
            left.as_ref().map(RoomId::as_str).unwrap_or("-")
        );
        left
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanvas_shared::time::FixedClock;
    use crate::{
        domain::{DrawingRequest, message_pusher::MockMessagePusher},
        infrastructure::repository::InMemoryRoomRepository,
        usecase::{
            join_room::JoinRoomUseCase,
            send_drawing_event::SendDrawingEventUseCase,
            test_support::{Fixture, drain, types},
        },
    };

    #[tokio::test]
    async fn test_disconnect_behaves_like_leave() {
        // テスト項目: leave せずに切断しても残りのメンバーに退出が通知される
        // given (前提条件):
        let fixture = Fixture::new();
        let join = JoinRoomUseCase::new(
            fixture.repository.clone(),
            fixture.message_pusher.clone(),
            fixture.clock.clone(),
        );
        let usecase = DisconnectSessionUseCase::new(
            fixture.repository.clone(),
            fixture.message_pusher.clone(),
            fixture.clock.clone(),
        );
        let room_id = fixture.create_room().await;
        let (mut alice, mut alice_rx) = fixture.connect("alice").await;
        let (mut bob, _bob_rx) = fixture.connect("bob").await;
        join.execute(&mut alice, room_id.to_string(), None).await.unwrap();
        join.execute(&mut bob, room_id.to_string(), None).await.unwrap();
        drain(&mut alice_rx);

        // when (操作):
        let left = usecase.execute(&mut bob).await;

        // then (期待する結果):
        assert_eq!(left, Some(room_id.clone()));
        assert!(bob.is_disconnected());
        assert_eq!(fixture.message_pusher.client_count().await, 1);

        let messages = drain(&mut alice_rx);
        assert_eq!(types(&messages), vec!["usersUpdated", "userLeft"]);
        let users = messages[0]["users"].as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["connectionId"], "alice");
    }

    #[tokio::test]
    async fn test_operations_after_disconnect_are_rejected() {
        // テスト項目: 切断後の操作は拒否され、Room には何も届かない
        // given (前提条件):
        let fixture = Fixture::new();
        let join = JoinRoomUseCase::new(
            fixture.repository.clone(),
            fixture.message_pusher.clone(),
            fixture.clock.clone(),
        );
        let draw = SendDrawingEventUseCase::new(
            fixture.repository.clone(),
            fixture.message_pusher.clone(),
            fixture.clock.clone(),
        );
        let usecase = DisconnectSessionUseCase::new(
            fixture.repository.clone(),
            fixture.message_pusher.clone(),
            fixture.clock.clone(),
        );
        let room_id = fixture.create_room().await;
        let (mut alice, mut alice_rx) = fixture.connect("alice").await;
        let (mut bob, _bob_rx) = fixture.connect("bob").await;
        join.execute(&mut alice, room_id.to_string(), None).await.unwrap();
        join.execute(&mut bob, room_id.to_string(), None).await.unwrap();
        usecase.execute(&mut bob).await;
        drain(&mut alice_rx);

        // when (操作):
        let rejoin = join.execute(&mut bob, room_id.to_string(), None).await;
        let drawn = draw
            .execute(&bob, room_id.to_string(), DrawingRequest::clear())
            .await;
        let again = usecase.execute(&mut bob).await;

        // then (期待する結果):
        assert!(rejoin.is_err());
        assert!(drawn.is_err());
        assert_eq!(again, None);
        assert!(drain(&mut alice_rx).is_empty());
        let room = fixture.repository.get_room(&room_id).await.unwrap();
        assert_eq!(room.member_count(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_unjoined_only_unregisters() {
        // テスト項目: 未参加の切断は送信チャンネルの登録解除だけを行う
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        pusher.expect_unregister_client().times(1).returning(|_| ());
        pusher.expect_broadcast().times(0);
        let usecase = DisconnectSessionUseCase::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(pusher),
            Arc::new(FixedClock::new(0)),
        );
        let mut session = Session::new(crate::domain::ConnectionId::generate());

        // when (操作):
        let left = usecase.execute(&mut session).await;

        // then (期待する結果):
        assert_eq!(left, None);
        assert!(session.is_disconnected());
    }
}
