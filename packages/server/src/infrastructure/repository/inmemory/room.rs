//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! `RwLock<HashMap>` を Room レジストリとして使用し、各 Room は個別の Mutex で保護します。
//!
//! ## ロックの粒度
//!
//! - レジストリの RwLock は ID → Room の対応表の操作中だけ保持する
//! - Room の Mutex はレジストリのロックを手放してから取得する
//! - 異なる Room への操作は互いにブロックしない
//!
//! 例外は `remove_idle_rooms` で、レジストリの書き込みロック中に `try_lock` で
//! Room を確認し、使用中の Room は待たずにスキップします。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    RandomRoomIdGenerator, RepositoryError, Room, RoomId, RoomIdGenerator, RoomRepository,
    SharedRoom, Timestamp,
};

/// ID 衝突時の再生成の上限
const MAX_ID_ATTEMPTS: usize = 1024;

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// Room レジストリ（Key: RoomId, Value: Room ごとの変更窓口）
    rooms: RwLock<HashMap<RoomId, SharedRoom>>,
    /// Room ID の候補生成器
    id_generator: Box<dyn RoomIdGenerator>,
}

impl InMemoryRoomRepository {
    /// ランダムな Room ID を使う Repository を作成
    pub fn new() -> Self {
        Self::with_id_generator(Box::new(RandomRoomIdGenerator))
    }

    /// Room ID の生成器を指定して作成
    pub fn with_id_generator(id_generator: Box<dyn RoomIdGenerator>) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            id_generator,
        }
    }

    /// 登録されている Room 数
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(&self, created_at: Timestamp) -> Result<RoomId, RepositoryError> {
        let mut rooms = self.rooms.write().await;

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = self.id_generator.generate();
            if rooms.contains_key(&candidate) {
                tracing::debug!(room_id = %candidate, attempt, "Room ID collision, retrying");
                continue;
            }

            let room = Room::new(candidate.clone(), created_at);
            rooms.insert(candidate.clone(), Arc::new(Mutex::new(room)));
            tracing::info!(room_id = %candidate, total_rooms = rooms.len(), "Room created");
            return Ok(candidate);
        }

        Err(RepositoryError::IdSpaceExhausted(MAX_ID_ATTEMPTS))
    }

    async fn exists(&self, room_id: &RoomId) -> bool {
        self.rooms.read().await.contains_key(room_id)
    }

    async fn find_room(&self, room_id: &RoomId) -> Option<SharedRoom> {
        self.rooms.read().await.get(room_id).cloned()
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let handle = self.find_room(room_id).await?;
        let room = handle.lock().await;
        if room.is_disposed() {
            return None;
        }
        Some(room.clone())
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let handles: Vec<SharedRoom> = self.rooms.read().await.values().cloned().collect();

        let mut snapshots = Vec::with_capacity(handles.len());
        for handle in handles {
            let room = handle.lock().await;
            if !room.is_disposed() {
                snapshots.push(room.clone());
            }
        }
        snapshots.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        snapshots
    }

    async fn remove_idle_rooms(&self, idle_since: Timestamp) -> Vec<RoomId> {
        let mut rooms = self.rooms.write().await;
        let mut removed = Vec::new();

        rooms.retain(|room_id, handle| match handle.try_lock() {
            Ok(mut room) if room.is_idle_since(idle_since) => {
                room.dispose();
                removed.push(room_id.clone());
                false
            }
            _ => true,
        });

        for room_id in &removed {
            tracing::info!(room_id = %room_id, "Idle room removed");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex as StdMutex};

    use super::*;
    use crate::domain::{ConnectionId, DisplayName};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRepository の作成・存在確認・取得・破棄
    // - ID 衝突時の再生成
    //
    // 【なぜこのテストが必要か】
    // - Repository は全 UseCase から共有されるレジストリの中核
    // - 同じ ID の Room が同時に存在しないことを保証する必要がある
    //
    // 【どのようなシナリオをテストするか】
    // 1. Room 作成後に存在確認・取得ができる
    // 2. 生成器が既存 ID を返しても別 ID で作成される
    // 3. 生成器が既存 ID しか返さない場合はエラーになる
    // 4. アイドル Room の破棄は空で古い Room のみが対象
    // 5. 並行作成で ID が重複しない
    // ========================================

    /// 決められた順に ID を返す生成器（尽きたら最後の ID を返し続ける）
    struct SequenceIdGenerator {
        ids: StdMutex<VecDeque<&'static str>>,
        last: &'static str,
    }

    impl SequenceIdGenerator {
        fn new(ids: &[&'static str]) -> Self {
            Self {
                ids: StdMutex::new(ids.iter().copied().collect()),
                last: ids[ids.len() - 1],
            }
        }
    }

    impl RoomIdGenerator for SequenceIdGenerator {
        fn generate(&self) -> RoomId {
            let next = self.ids.lock().unwrap().pop_front().unwrap_or(self.last);
            RoomId::new(next.to_string()).unwrap()
        }
    }

    fn room_id(raw: &str) -> RoomId {
        RoomId::new(raw.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_room_then_lookup() {
        // テスト項目: 作成した Room は存在確認・取得でき、未知の ID は存在しない
        // given (前提条件):
        let repo = InMemoryRoomRepository::with_id_generator(Box::new(SequenceIdGenerator::new(
            &["A1B2C3"],
        )));

        // when (操作):
        let created = repo.create_room(Timestamp::new(1000)).await.unwrap();

        // then (期待する結果):
        assert_eq!(created, room_id("A1B2C3"));
        assert!(repo.exists(&created).await);
        assert!(!repo.exists(&room_id("ZZZZZZ")).await);

        let room = repo.get_room(&created).await.unwrap();
        assert_eq!(room.created_at, Timestamp::new(1000));
        assert_eq!(room.member_count(), 0);
        assert!(room.history().is_empty());
        assert!(repo.get_room(&room_id("ZZZZZZ")).await.is_none());
    }

    #[tokio::test]
    async fn test_create_room_retries_on_collision() {
        // テスト項目: 生成器が使用中の ID を返した場合は再生成される
        // given (前提条件):
        let repo = InMemoryRoomRepository::with_id_generator(Box::new(SequenceIdGenerator::new(
            &["AAAAAA", "AAAAAA", "AAAAAA", "BBBBBB"],
        )));
        let first = repo.create_room(Timestamp::new(1)).await.unwrap();

        // when (操作):
        let second = repo.create_room(Timestamp::new(2)).await.unwrap();

        // then (期待する結果):
        assert_eq!(first, room_id("AAAAAA"));
        assert_eq!(second, room_id("BBBBBB"));
        assert_eq!(repo.room_count().await, 2);
    }

    #[tokio::test]
    async fn test_create_room_gives_up_when_ids_exhausted() {
        // テスト項目: 使用中の ID しか得られない場合はエラーになり Room は増えない
        // given (前提条件):
        let repo = InMemoryRoomRepository::with_id_generator(Box::new(SequenceIdGenerator::new(
            &["AAAAAA"],
        )));
        repo.create_room(Timestamp::new(1)).await.unwrap();

        // when (操作):
        let result = repo.create_room(Timestamp::new(2)).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::IdSpaceExhausted(MAX_ID_ATTEMPTS))
        );
        assert_eq!(repo.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_find_room_shares_state() {
        // テスト項目: find_room で得たハンドル経由の変更はスナップショットに反映される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let id = repo.create_room(Timestamp::new(1)).await.unwrap();

        // when (操作):
        {
            let handle = repo.find_room(&id).await.unwrap();
            let mut room = handle.lock().await;
            room.upsert_member(
                ConnectionId::new("alice".to_string()).unwrap(),
                DisplayName::new("Alice".to_string()).unwrap(),
                Timestamp::new(2),
            );
        }

        // then (期待する結果):
        let snapshot = repo.get_room(&id).await.unwrap();
        assert_eq!(snapshot.member_count(), 1);
    }

    #[tokio::test]
    async fn test_remove_idle_rooms_only_removes_empty_stale_rooms() {
        // テスト項目: 空かつ古い Room のみ破棄され、破棄済みハンドルは disposed になる
        // given (前提条件):
        let repo = InMemoryRoomRepository::with_id_generator(Box::new(SequenceIdGenerator::new(
            &["OLD000", "NEW000", "BUSY00"],
        )));
        let old = repo.create_room(Timestamp::new(100)).await.unwrap();
        let new = repo.create_room(Timestamp::new(900)).await.unwrap();
        let busy = repo.create_room(Timestamp::new(100)).await.unwrap();
        {
            let handle = repo.find_room(&busy).await.unwrap();
            handle.lock().await.upsert_member(
                ConnectionId::new("alice".to_string()).unwrap(),
                DisplayName::default(),
                Timestamp::new(100),
            );
        }
        let stale_handle = repo.find_room(&old).await.unwrap();

        // when (操作):
        let removed = repo.remove_idle_rooms(Timestamp::new(500)).await;

        // then (期待する結果):
        assert_eq!(removed, vec![old.clone()]);
        assert!(!repo.exists(&old).await);
        assert!(repo.exists(&new).await);
        assert!(repo.exists(&busy).await);
        assert!(stale_handle.lock().await.is_disposed());
    }

    #[tokio::test]
    async fn test_list_rooms_sorted_by_creation() {
        // テスト項目: Room 一覧は作成時刻順に並ぶ
        // given (前提条件):
        let repo = InMemoryRoomRepository::with_id_generator(Box::new(SequenceIdGenerator::new(
            &["CCCCCC", "AAAAAA", "BBBBBB"],
        )));
        repo.create_room(Timestamp::new(3)).await.unwrap();
        repo.create_room(Timestamp::new(1)).await.unwrap();
        repo.create_room(Timestamp::new(2)).await.unwrap();

        // when (操作):
        let rooms = repo.list_rooms().await;

        // then (期待する結果):
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["AAAAAA", "BBBBBB", "CCCCCC"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create_room_never_duplicates() {
        // テスト項目: 並行して作成しても ID が重複しない
        // given (前提条件):
        let repo = Arc::new(InMemoryRoomRepository::new());

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..64 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.create_room(Timestamp::new(i)).await.unwrap()
            }));
        }
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        // then (期待する結果):
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 64);
        assert_eq!(repo.room_count().await, 64);
    }
}
