//! Collaborative drawing server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kanvas-server
//! cargo run --bin kanvas-server -- --host 0.0.0.0 --port 3000
//! cargo run --bin kanvas-server -- --idle-room-ttl-secs 3600 --reap-interval-secs 60
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use kanvas_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{
        AppState, Server, ServerConfig,
        config::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REAP_INTERVAL},
    },
    usecase::ReapIdleRoomsUseCase,
};
use kanvas_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "kanvas-server")]
#[command(about = "Real-time collaborative drawing server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Remove rooms that have been empty and idle for this many seconds (disabled when omitted)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    idle_room_ttl_secs: Option<u64>,

    /// Interval between idle-room sweeps
    #[arg(long, default_value_t = DEFAULT_REAP_INTERVAL.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    reap_interval_secs: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            idle_room_ttl: args.idle_room_ttl_secs.map(Duration::from_secs),
            reap_interval: Duration::from_secs(args.reap_interval_secs),
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(&args);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases (AppState)
    // 4. Server
    let repository = Arc::new(InMemoryRoomRepository::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::default());
    let clock = Arc::new(SystemClock);

    let state = AppState::new(repository.clone(), message_pusher, clock.clone());

    let mut server = Server::new(config.clone(), state);
    if let Some(ttl) = config.idle_room_ttl {
        tracing::info!("Rooms idle for {:?} will be removed", ttl);
        server = server.with_reaper(ReapIdleRoomsUseCase::new(repository, clock, ttl));
    }

    if let Err(e) = server.run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_without_flags_match_config_defaults() {
        // テスト項目: 引数を省略した場合の設定は ServerConfig の既定値と一致する
        // when (操作):
        let args = Args::parse_from(["kanvas-server"]);
        let config = ServerConfig::from(&args);

        // then (期待する結果):
        let defaults = ServerConfig::default();
        assert_eq!(config.host, defaults.host);
        assert_eq!(config.port, defaults.port);
        assert_eq!(config.reap_interval, defaults.reap_interval);
        assert_eq!(config.idle_room_ttl, None);
    }

    #[test]
    fn test_args_override_port_and_enable_reaper() {
        // テスト項目: ポートと TTL を指定すると設定に反映される
        // when (操作):
        let args = Args::parse_from(["kanvas-server", "-p", "9000", "--idle-room-ttl-secs", "30"]);
        let config = ServerConfig::from(&args);

        // then (期待する結果):
        assert_eq!(config.port, 9000);
        assert_eq!(config.idle_room_ttl, Some(Duration::from_secs(30)));
    }
}
