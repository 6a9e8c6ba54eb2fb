//! UseCase: キャンバスのクリア
//!
//! 参加中のメンバーであれば誰でもクリアできます。履歴を空にし、
//! Room 全体に clearCanvas を送ります。

use std::sync::Arc;

use kanvas_shared::time::Clock;

use crate::domain::{MessagePusher, Notification, Room, RoomRepository, Session, Timestamp};

use super::{broadcaster::RoomBroadcaster, error::DrawingError, room_access::lock_joined_room};

/// キャンバスクリアのユースケース
pub struct ClearCanvasUseCase {
    repository: Arc<dyn RoomRepository>,
    broadcaster: RoomBroadcaster,
    clock: Arc<dyn Clock>,
}

impl ClearCanvasUseCase {
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

    /// 履歴をクリアする。失敗時は呼び出し元に drawingError を送る。
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 削除したイベント数
    pub async fn execute(&self, session: &Session, room_id: String) -> Result<usize, DrawingError> {
        let result = match lock_joined_room(self.repository.as_ref(), session, &room_id).await {
            Ok(mut room) => {
                let now = Timestamp::new(self.clock.now_millis());
                Ok(clear_room(&mut room, &self.broadcaster, now).await)
            }
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            report_drawing_error(&self.broadcaster, session, e).await;
        }
        result
    }
}

/// ロック済みの Room の履歴を空にして Room 全体へ通知する
pub(crate) async fn clear_room(
    room: &mut Room,
    broadcaster: &RoomBroadcaster,
    now: Timestamp,
) -> usize {
    let cleared = room.clear_history(now);
    tracing::info!("Room '{}' cleared ({} event(s) dropped)", room.id, cleared);
    broadcaster.to_room(room, &Notification::ClearCanvas).await;
    cleared
}

/// 描画系操作の失敗を呼び出し元にだけ返す
pub(crate) async fn report_drawing_error(
    broadcaster: &RoomBroadcaster,
    session: &Session,
    error: &DrawingError,
) {
    match error {
        DrawingError::Internal(_) => tracing::error!("{}", error),
        _ => tracing::info!("Drawing rejected for '{}': {}", session.connection_id(), error),
    }
    broadcaster
        .to_caller(
            session.connection_id(),
            &Notification::DrawingError {
                reason: error.reason(),
            },
        )
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DrawingKind, DrawingRequest, Point, StrokeGeometry},
        usecase::{
            join_room::JoinRoomUseCase,
            send_drawing_event::SendDrawingEventUseCase,
            test_support::{Fixture, drain, types},
        },
    };

    fn point(x: f64, y: f64) -> DrawingRequest {
        DrawingRequest::new(
            DrawingKind::Point,
            StrokeGeometry {
                position: Point::new(x, y).unwrap(),
                ..StrokeGeometry::default()
            },
        )
    }

    #[tokio::test]
    async fn test_clear_truncates_history_for_everyone() {
        // テスト項目: クリア後は履歴が空になり、後から参加した接続にも空の履歴が届く
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
        let clear = ClearCanvasUseCase::new(
            fixture.repository.clone(),
            fixture.message_pusher.clone(),
            fixture.clock.clone(),
        );
        let room_id = fixture.create_room().await;
        let (mut alice, mut alice_rx) = fixture.connect("alice").await;
        let (mut bob, mut bob_rx) = fixture.connect("bob").await;
        join.execute(&mut alice, room_id.to_string(), None).await.unwrap();
        join.execute(&mut bob, room_id.to_string(), None).await.unwrap();
        for i in 0..3 {
            draw.execute(&alice, room_id.to_string(), point(i as f64, 0.0))
                .await
                .unwrap();
        }
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        // when (操作): alice 以外のメンバーでもクリアできる
        let cleared = clear.execute(&bob, room_id.to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(cleared, 3);
        assert_eq!(types(&drain(&mut alice_rx)), vec!["clearCanvas"]);
        assert_eq!(types(&drain(&mut bob_rx)), vec!["clearCanvas"]);

        let (mut carol, mut carol_rx) = fixture.connect("carol").await;
        join.execute(&mut carol, room_id.to_string(), None).await.unwrap();
        let messages = drain(&mut carol_rx);
        assert_eq!(messages[0]["type"], "drawingHistory");
        assert!(messages[0]["events"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_requires_membership() {
        // テスト項目: メンバーでない接続のクリアは拒否され、呼び出し元にだけ通知される
        // given (前提条件):
        let fixture = Fixture::new();
        let clear = ClearCanvasUseCase::new(
            fixture.repository.clone(),
            fixture.message_pusher.clone(),
            fixture.clock.clone(),
        );
        let room_id = fixture.create_room().await;
        let (eve, mut eve_rx) = fixture.connect("eve").await;

        // when (操作):
        let not_member = clear.execute(&eve, room_id.to_string()).await;
        let unknown = clear.execute(&eve, "ZZZZZZ".to_string()).await;

        // then (期待する結果):
        assert!(matches!(not_member, Err(DrawingError::InvalidRequest(_))));
        assert_eq!(unknown, Err(DrawingError::RoomNotFound("ZZZZZZ".to_string())));
        assert_eq!(types(&drain(&mut eve_rx)), vec!["drawingError", "drawingError"]);
    }

    #[tokio::test]
    async fn test_clear_disposed_room_is_not_found() {
        // テスト項目: 破棄済みの Room のクリアは RoomNotFound になり、呼び出し元にだけ通知される
        // given (前提条件):
        let fixture = Fixture::new();
        let join = JoinRoomUseCase::new(
            fixture.repository.clone(),
            fixture.message_pusher.clone(),
            fixture.clock.clone(),
        );
        let clear = ClearCanvasUseCase::new(
            fixture.repository.clone(),
            fixture.message_pusher.clone(),
            fixture.clock.clone(),
        );
        let room_id = fixture.create_room().await;
        let (mut alice, mut alice_rx) = fixture.connect("alice").await;
        let (mut bob, mut bob_rx) = fixture.connect("bob").await;
        join.execute(&mut alice, room_id.to_string(), None).await.unwrap();
        join.execute(&mut bob, room_id.to_string(), None).await.unwrap();
        drain(&mut alice_rx);
        drain(&mut bob_rx);
        fixture.dispose_room(&room_id).await;

        // when (操作):
        let result = clear.execute(&alice, room_id.to_string()).await;

        // then (期待する結果):
        assert_eq!(result, Err(DrawingError::RoomNotFound(room_id.to_string())));
        assert_eq!(types(&drain(&mut alice_rx)), vec!["drawingError"]);
        assert!(drain(&mut bob_rx).is_empty());
    }
}
