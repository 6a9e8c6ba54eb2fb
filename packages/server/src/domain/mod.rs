//! Domain layer: room model, coordinator state and the seams to the outside.

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod notification;
pub mod repository;
pub mod value_object;

pub use entity::{
    DrawingEvent, DrawingKind, DrawingRequest, Member, MembershipChange, Point, Room, Session,
    SessionState, StrokeGeometry,
};
pub use error::{MessagePushError, RepositoryError, RoomError, ValueObjectError};
pub use factory::{RandomRoomIdGenerator, RoomIdGenerator};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use notification::Notification;
pub use repository::{RoomRepository, SharedRoom};
pub use value_object::{ConnectionId, DisplayName, RoomId, Timestamp};
