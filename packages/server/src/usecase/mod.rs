//! UseCase layer: Session Coordinator operations and room queries.

pub mod broadcaster;
pub mod check_room;
pub mod clear_canvas;
pub mod connect_session;
pub mod create_room;
pub mod disconnect_session;
pub mod error;
pub mod get_room_detail;
pub mod get_rooms;
pub mod join_room;
pub mod leave_room;
pub mod reap_idle_rooms;
mod room_access;
pub mod send_drawing_event;

#[cfg(test)]
pub(crate) mod test_support;

pub use broadcaster::RoomBroadcaster;
pub use check_room::CheckRoomUseCase;
pub use clear_canvas::ClearCanvasUseCase;
pub use connect_session::ConnectSessionUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{CreateRoomError, DrawingError, GetRoomDetailError, JoinRoomError, PrecheckError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use reap_idle_rooms::ReapIdleRoomsUseCase;
pub use send_drawing_event::{DrawingOutcome, SendDrawingEventUseCase};
