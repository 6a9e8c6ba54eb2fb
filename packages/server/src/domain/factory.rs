//! Room identifier generation.

use rand::Rng;

use super::value_object::{ROOM_ID_ALPHABET, ROOM_ID_LENGTH, RoomId};

/// Source of candidate room identifiers.
///
/// Candidates may collide with live rooms; the registry is responsible for
/// retrying until it finds an unused one.
pub trait RoomIdGenerator: Send + Sync {
    fn generate(&self) -> RoomId;
}

/// Uniformly random 6-symbol identifiers over `[A-Z0-9]` (36^6 combinations)
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomRoomIdGenerator;

impl RoomIdGenerator for RandomRoomIdGenerator {
    fn generate(&self) -> RoomId {
        let mut rng = rand::thread_rng();
        let id: String = (0..ROOM_ID_LENGTH)
            .map(|_| ROOM_ID_ALPHABET[rng.gen_range(0..ROOM_ID_ALPHABET.len())] as char)
            .collect();
        RoomId::from_generated(id)
    }
}
