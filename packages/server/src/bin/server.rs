//! Murmur chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin murmur-server
//! cargo run --bin murmur-server -- --host 0.0.0.0 --port 3000 --database murmur.db
//! ```

use std::sync::Arc;

use clap::Parser;
use murmur_server::{
    config::{ServerArgs, ServerConfig},
    domain::{MessageStore, UserRepository},
    infrastructure::repository::{
        Database, InMemoryMessageStore, InMemoryUserRepository, SqliteMessageStore,
        SqliteUserRepository,
    },
    ui::{AppState, Server},
};
use murmur_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(ServerArgs::parse());

    // 1. Create storage backends
    let (store, users): (Arc<dyn MessageStore>, Arc<dyn UserRepository>) = match &config.database
    {
        Some(path) => match Database::open(path) {
            Ok(db) => (
                Arc::new(SqliteMessageStore::new(db.clone())),
                Arc::new(SqliteUserRepository::new(db)),
            ),
            Err(e) => {
                tracing::error!("Failed to open database '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::info!("No database configured, keeping messages in memory");
            (
                Arc::new(InMemoryMessageStore::new()),
                Arc::new(InMemoryUserRepository::new()),
            )
        }
    };

    // 2. No mute timer survives a restart
    match users.clear_all_mutes().await {
        Ok(0) => {}
        Ok(cleared) => tracing::info!("Cleared {} stale mute flag(s)", cleared),
        Err(e) => tracing::warn!("Failed to clear stale mute flags: {}", e),
    }

    tracing::info!(
        "Spam policy: {} message(s) per {:?} quiet window, {:?} mute",
        config.throttle.burst_limit,
        config.throttle.quiet_window,
        config.throttle.mute_cooldown
    );

    // 3. Wire use cases and run the server
    let state = AppState::build(
        store,
        users,
        Arc::new(SystemClock),
        config.throttle,
        config.queue_capacity,
    );
    if let Err(e) = Server::new(state).run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
