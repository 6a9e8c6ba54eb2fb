//! UseCase テスト用のフィクスチャ

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use kanvas_shared::time::Clock;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, MessagePusher, RoomId, RoomRepository, Session, Timestamp},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
};

/// テストから時刻を進めたり戻したりできる時計
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

pub struct Fixture {
    pub repository: Arc<InMemoryRoomRepository>,
    pub message_pusher: Arc<WebSocketMessagePusher>,
    pub clock: Arc<ManualClock>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(InMemoryRoomRepository::new()),
            message_pusher: Arc::new(WebSocketMessagePusher::default()),
            clock: Arc::new(ManualClock::new(1_000)),
        }
    }

    pub async fn create_room(&self) -> RoomId {
        self.repository
            .create_room(Timestamp::new(self.clock.now_millis()))
            .await
            .unwrap()
    }

    /// Room を破棄済みにする。レジストリには残すため、取得済みのハンドルと同じ状態になる
    pub async fn dispose_room(&self, room_id: &RoomId) {
        let shared = self.repository.find_room(room_id).await.unwrap();
        shared.lock().await.dispose();
    }

    /// 接続を登録し、未参加の Session と受信側チャンネルを返す
    pub async fn connect(&self, raw: &str) -> (Session, mpsc::UnboundedReceiver<String>) {
        let connection_id = ConnectionId::new(raw.to_string()).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        self.message_pusher
            .register_client(connection_id.clone(), tx)
            .await;
        (Session::new(connection_id), rx)
    }
}

/// 受信済みのメッセージをすべて JSON として取り出す
pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<Value> {
    let mut messages = Vec::new();
    while let Ok(text) = rx.try_recv() {
        messages.push(serde_json::from_str(&text).unwrap());
    }
    messages
}

/// メッセージの `type` フィールドだけを並べる
pub fn types(messages: &[Value]) -> Vec<String> {
    messages
        .iter()
        .map(|m| m["type"].as_str().unwrap_or_default().to_string())
        .collect()
}
