//! MessagePusher trait 定義
//!
//! 接続中のクライアントへ通知を届けるためのインターフェース。
//! ドメイン層が定義し、具体的な実装（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, notification::Notification, value_object::ConnectionId};

/// クライアントへのメッセージ送信チャンネル（エンコード済みのテキストを運ぶ）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// ## 配送の保証
///
/// - 受け付けた通知は宛先ごとに送信順で届く
/// - `broadcast` は呼び出し時点の宛先リストにのみ配送する（途中参加者は対象外）
/// - `broadcast` は一部の宛先への失敗を許容し、ログに残して続行する
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定のクライアントへ通知を送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントへ通知を送信
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;
}
