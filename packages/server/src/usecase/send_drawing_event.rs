//! UseCase: 描画イベントの送信
//!
//! 受け付けたイベントには送信者と時刻をサーバー側で刻印し、種類ごとに処理します。
//!
//! | 種類 | 描画状態 | 事前通知 | 履歴 | 配送 |
//! |------|----------|----------|------|------|
//! | BeginStroke | `is_drawing = true` | userStartedDrawing + usersUpdated | 追加 | Room 全体 |
//! | Point | - | - | 追加 | Room 全体 |
//! | EndStroke | `is_drawing = false` | userStoppedDrawing + usersUpdated | 追加 | Room 全体 |
//! | Clear | - | - | 全削除 | clearCanvas |
//!
//! 通知はすべて Room のロックを保持したまま送るため、履歴の順序と配送順序が一致します。

use std::sync::Arc;

use kanvas_shared::time::Clock;

use crate::domain::{
    DrawingEvent, DrawingKind, DrawingRequest, MessagePusher, Notification, Room, RoomError,
    RoomRepository, Session, Timestamp,
};

use super::{
    broadcaster::RoomBroadcaster,
    clear_canvas::{clear_room, report_drawing_error},
    error::DrawingError,
    room_access::lock_joined_room,
};

/// 描画イベント受理の結果
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingOutcome {
    /// 履歴に追加されたイベント
    Appended(DrawingEvent),
    /// クリアで削除したイベント数
    Cleared(usize),
}

/// 描画イベント送信のユースケース
pub struct SendDrawingEventUseCase {
    repository: Arc<dyn RoomRepository>,
    broadcaster: RoomBroadcaster,
    clock: Arc<dyn Clock>,
}

impl SendDrawingEventUseCase {
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

    /// 描画イベントを受理する。失敗時は呼び出し元に drawingError を送る。
    pub async fn execute(
        &self,
        session: &Session,
        room_id: String,
        request: DrawingRequest,
    ) -> Result<DrawingOutcome, DrawingError> {
        let result = match lock_joined_room(self.repository.as_ref(), session, &room_id).await {
            Ok(mut room) => self.dispatch(&mut room, session, request).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            report_drawing_error(&self.broadcaster, session, e).await;
        }
        result
    }

    /// 検証済みの Room に対してイベントを種類ごとに処理する
    async fn dispatch(
        &self,
        room: &mut Room,
        session: &Session,
        request: DrawingRequest,
    ) -> Result<DrawingOutcome, DrawingError> {
        let now = Timestamp::new(self.clock.now_millis());
        let sender = session.connection_id();

        match request.kind {
            DrawingKind::Clear => {
                let cleared = clear_room(room, &self.broadcaster, now).await;
                return Ok(DrawingOutcome::Cleared(cleared));
            }
            DrawingKind::BeginStroke | DrawingKind::EndStroke => {
                let is_drawing = request.kind == DrawingKind::BeginStroke;
                room.set_drawing(sender, is_drawing).map_err(internal)?;
                let display_name = room
                    .member(sender)
                    .map(|m| m.display_name.clone())
                    .unwrap_or_default();

                let presence = if is_drawing {
                    Notification::UserStartedDrawing {
                        connection_id: sender.clone(),
                        display_name,
                        tool: request.geometry.tool.clone(),
                    }
                } else {
                    Notification::UserStoppedDrawing {
                        connection_id: sender.clone(),
                        display_name,
                    }
                };
                self.broadcaster.to_room(room, &presence).await;
                self.broadcaster
                    .to_room(
                        room,
                        &Notification::UsersUpdated {
                            members: room.members().to_vec(),
                        },
                    )
                    .await;
            }
            DrawingKind::Point => {}
        }

        let event = room.append_event(request, sender, now).map_err(internal)?;
        tracing::debug!(
            "Room '{}' accepted {:?} from '{}' (history: {})",
            room.id,
            event.kind,
            sender,
            room.history().len()
        );
        self.broadcaster
            .to_room(
                room,
                &Notification::ReceiveDrawingEvent {
                    event: event.clone(),
                },
            )
            .await;

        Ok(DrawingOutcome::Appended(event))
    }
}

fn internal(error: RoomError) -> DrawingError {
    DrawingError::Internal(error.to_string())
}
