//! Event Broadcaster
//!
//! 通知の宛先（呼び出し元 / Room 全体 / 呼び出し元以外）を Room から計算し、
//! `MessagePusher` に配送を依頼します。宛先はロック中の Room から取るため、
//! 呼び出し時点のメンバーにだけ届きます。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Notification, Room};

pub struct RoomBroadcaster {
    message_pusher: Arc<dyn MessagePusher>,
}

impl RoomBroadcaster {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 呼び出し元の接続だけに送る
    pub async fn to_caller(&self, connection_id: &ConnectionId, notification: &Notification) {
        if let Err(e) = self.message_pusher.push_to(connection_id, notification).await {
            tracing::warn!(
                "Failed to deliver '{}' to '{}': {}",
                notification.name(),
                connection_id,
                e
            );
        }
    }

    /// 送信者を含む Room の全メンバーへ送る
    pub async fn to_room(&self, room: &Room, notification: &Notification) {
        self.deliver(room, room.member_ids(), notification).await;
    }

    /// `except` 以外の Room メンバーへ送る
    pub async fn to_others(&self, room: &Room, except: &ConnectionId, notification: &Notification) {
        self.deliver(room, room.member_ids_except(except), notification)
            .await;
    }

    async fn deliver(&self, room: &Room, targets: Vec<ConnectionId>, notification: &Notification) {
        if targets.is_empty() {
            return;
        }
        let count = targets.len();
        match self.message_pusher.broadcast(targets, notification).await {
            Ok(()) => tracing::debug!(
                "Broadcasted '{}' to {} member(s) of room '{}'",
                notification.name(),
                count,
                room.id
            ),
            Err(e) => tracing::warn!(
                "Failed to broadcast '{}' in room '{}': {}",
                notification.name(),
                room.id,
                e
            ),
        }
    }
}
