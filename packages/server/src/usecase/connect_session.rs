//! UseCase: 接続の受け入れ
//!
//! トランスポートがソケットを受け入れた直後に呼ばれ、接続 ID を払い出して
//! 送信チャンネルを MessagePusher に登録します。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Notification, PusherChannel, Session};

/// 接続受け入れのユースケース
pub struct ConnectSessionUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectSessionUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続を受け入れ、未参加状態の Session を返す
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    pub async fn execute(&self, sender: PusherChannel) -> Session {
        let connection_id = ConnectionId::generate();

        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        let notification = Notification::Connected {
            connection_id: connection_id.clone(),
        };
        if let Err(e) = self
            .message_pusher
            .push_to(&connection_id, &notification)
            .await
        {
            tracing::warn!("Failed to greet connection '{}': {}", connection_id, e);
        }

        tracing::info!("Connection '{}' accepted", connection_id);
        Session::new(connection_id)
    }
}
