//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    entity::Room,
    error::RepositoryError,
    value_object::{RoomId, Timestamp},
};

/// Room への唯一の変更窓口
///
/// 1 つの Room に対する変更（メンバー・履歴）と、その変更に伴う通知の送出は
/// すべてこの Mutex を保持したまま行います。これにより履歴の順序と配送順序が一致します。
pub type SharedRoom = Arc<Mutex<Room>>;

/// Room Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 未使用の ID で空の Room を作成（ID 生成と登録は不可分）
    async fn create_room(&self, created_at: Timestamp) -> Result<RoomId, RepositoryError>;

    /// Room が存在するか
    async fn exists(&self, room_id: &RoomId) -> bool;

    /// Room の変更窓口を取得
    async fn find_room(&self, room_id: &RoomId) -> Option<SharedRoom>;

    /// Room のスナップショットを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 全 Room のスナップショットを作成時刻順に取得
    async fn list_rooms(&self) -> Vec<Room>;

    /// `idle_since` 以降に活動のない空の Room を破棄し、その ID を返す
    async fn remove_idle_rooms(&self, idle_since: Timestamp) -> Vec<RoomId>;
}
