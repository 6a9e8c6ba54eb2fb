//! WebSocket connection handlers.
//!
//! 1 接続につき 1 つのループがフレームを受信順に処理します。操作は最後まで
//! 実行してから次のフレームを読むため、途中で中断されることはありません。

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{DrawingRequest, Notification, Session},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards queued messages to the WebSocket sink.
///
/// Ends when the channel is closed or the socket stops accepting writes.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    let mut session = state.connect_session_usecase.execute(tx).await;
    let mut send_task = pusher_loop(rx, sender);

    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    handle_text(&state, &mut session, text.as_str()).await;
                }
                Some(Ok(Message::Binary(_))) => {
                    reject_frame(&state, &session, "Binary frames are not supported".to_string())
                        .await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!("Connection '{}' requested close", session.connection_id());
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on '{}': {}", session.connection_id(), e);
                    break;
                }
            },
            _ = &mut send_task => break,
        }
    }

    state.disconnect_session_usecase.execute(&mut session).await;
    send_task.abort();
}

/// Decode one text frame and run the matching operation to completion
async fn handle_text(state: &AppState, session: &mut Session, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(
                "Failed to parse message from '{}': {}",
                session.connection_id(),
                e
            );
            reject_frame(state, session, format!("Malformed message: {}", e)).await;
            return;
        }
    };

    match message {
        ClientMessage::Join {
            room_id,
            display_name,
        } => {
            // 失敗は UseCase が joinError として呼び出し元に返す
            let _ = state
                .join_room_usecase
                .execute(session, room_id, display_name)
                .await;
        }
        ClientMessage::Leave { room_id } => {
            state.leave_room_usecase.execute(session, room_id).await;
        }
        ClientMessage::SendDrawingEvent { room_id, event } => {
            match DrawingRequest::try_from(event) {
                Ok(request) => {
                    let _ = state
                        .send_drawing_event_usecase
                        .execute(session, room_id, request)
                        .await;
                }
                Err(e) => {
                    tracing::info!(
                        "Invalid drawing event from '{}': {}",
                        session.connection_id(),
                        e
                    );
                    state
                        .broadcaster
                        .to_caller(
                            session.connection_id(),
                            &Notification::DrawingError {
                                reason: e.to_string(),
                            },
                        )
                        .await;
                }
            }
        }
        ClientMessage::ClearCanvas { room_id } => {
            let _ = state.clear_canvas_usecase.execute(session, room_id).await;
        }
    }
}

async fn reject_frame(state: &AppState, session: &Session, reason: String) {
    state
        .broadcaster
        .to_caller(session.connection_id(), &Notification::RequestError { reason })
        .await;
}
