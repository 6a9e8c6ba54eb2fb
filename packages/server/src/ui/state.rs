//! Shared application state.

use std::sync::Arc;

use kanvas_shared::time::Clock;

use crate::{
    domain::{MessagePusher, RoomRepository},
    usecase::{
        CheckRoomUseCase, ClearCanvasUseCase, ConnectSessionUseCase, CreateRoomUseCase,
        DisconnectSessionUseCase, GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase,
        LeaveRoomUseCase, RoomBroadcaster, SendDrawingEventUseCase,
    },
};

/// Use cases reachable from the handlers
pub struct AppState {
    pub connect_session_usecase: ConnectSessionUseCase,
    pub join_room_usecase: JoinRoomUseCase,
    pub leave_room_usecase: LeaveRoomUseCase,
    pub send_drawing_event_usecase: SendDrawingEventUseCase,
    pub clear_canvas_usecase: ClearCanvasUseCase,
    pub disconnect_session_usecase: DisconnectSessionUseCase,
    pub create_room_usecase: CreateRoomUseCase,
    pub check_room_usecase: CheckRoomUseCase,
    pub get_rooms_usecase: GetRoomsUseCase,
    pub get_room_detail_usecase: GetRoomDetailUseCase,
    /// Replies to frames that never reach a use case (malformed JSON, bad payloads)
    pub broadcaster: RoomBroadcaster,
}

impl AppState {
    /// Wire every use case to the same registry, pusher and clock
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connect_session_usecase: ConnectSessionUseCase::new(message_pusher.clone()),
            join_room_usecase: JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            leave_room_usecase: LeaveRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            send_drawing_event_usecase: SendDrawingEventUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            clear_canvas_usecase: ClearCanvasUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            disconnect_session_usecase: DisconnectSessionUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            create_room_usecase: CreateRoomUseCase::new(repository.clone(), clock),
            check_room_usecase: CheckRoomUseCase::new(repository.clone()),
            get_rooms_usecase: GetRoomsUseCase::new(repository.clone()),
            get_room_detail_usecase: GetRoomDetailUseCase::new(repository),
            broadcaster: RoomBroadcaster::new(message_pusher),
        }
    }
}
