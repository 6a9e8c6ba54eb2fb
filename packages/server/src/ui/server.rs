//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use thiserror::Error;
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::usecase::ReapIdleRoomsUseCase;

use super::{
    config::ServerConfig,
    handler::{
        create_room, get_room_detail, get_rooms, health_check, join_room_precheck, room_exists,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Collaborative drawing server
///
/// # Example
///
/// ```ignore
/// let state = AppState::new(repository, message_pusher, clock);
/// Server::new(ServerConfig::default(), state).run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
    /// Idle-room reaper, only present when a TTL is configured
    reaper: Option<Arc<ReapIdleRoomsUseCase>>,
}

impl Server {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
            reaper: None,
        }
    }

    pub fn with_reaper(mut self, reaper: ReapIdleRoomsUseCase) -> Self {
        self.reaper = Some(Arc::new(reaper));
        self
    }

    /// Build the router (exposed for in-process tests)
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // Room ライフサイクル
            .route("/api/room/create", post(create_room))
            .route("/api/room/join", post(join_room_precheck))
            .route("/api/room/{room_id}/exists", get(room_exists))
            // 参照系
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Bind to the configured address and serve until a shutdown signal arrives
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!("Drawing server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        let reaper_task = self.spawn_reaper();
        let app = self.router();

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        if let Some(task) = reaper_task {
            task.abort();
        }
        result?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    fn spawn_reaper(&self) -> Option<JoinHandle<()>> {
        let reaper = self.reaper.clone()?;
        let interval = self.config.reap_interval;
        tracing::info!("Idle-room reaper enabled (every {:?})", interval);

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // 初回の tick は即座に完了する
            ticker.tick().await;
            loop {
                ticker.tick().await;
                reaper.execute().await;
            }
        }))
    }
}
