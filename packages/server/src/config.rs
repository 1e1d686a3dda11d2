//! Server configuration.
//!
//! Every option can be given on the command line or through a `MURMUR_*`
//! environment variable; the command line wins.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::domain::ThrottlePolicy;

pub const DEFAULT_QUEUE_CAPACITY: u32 = 64;

#[derive(Parser, Debug, Clone)]
#[command(name = "murmur-server")]
#[command(about = "Realtime single-room chat server with spam muting", long_about = None)]
pub struct ServerArgs {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "MURMUR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "MURMUR_PORT", default_value_t = 8080)]
    pub port: u16,

    /// SQLite database file. Messages and users are kept in memory when omitted
    #[arg(long, env = "MURMUR_DATABASE")]
    pub database: Option<PathBuf>,

    /// Messages accepted within one quiet window before the sender is muted
    #[arg(
        long,
        env = "MURMUR_BURST_LIMIT",
        default_value_t = 3,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub burst_limit: u32,

    /// Silence (ms) after which an author's message counter resets
    #[arg(long, env = "MURMUR_QUIET_WINDOW_MS", default_value_t = 2_000)]
    pub quiet_window_ms: u64,

    /// Duration (ms) of a spam mute
    #[arg(long, env = "MURMUR_MUTE_COOLDOWN_MS", default_value_t = 10_000)]
    pub mute_cooldown_ms: u64,

    /// Outbound events buffered per connection before events are dropped for it
    #[arg(
        long,
        env = "MURMUR_QUEUE_CAPACITY",
        default_value_t = DEFAULT_QUEUE_CAPACITY,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub queue_capacity: u32,
}

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<PathBuf>,
    pub throttle: ThrottlePolicy,
    /// Capacity of each connection's outbound queue (always >= 1)
    pub queue_capacity: usize,
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            database: args.database,
            throttle: ThrottlePolicy {
                burst_limit: args.burst_limit,
                quiet_window: Duration::from_millis(args.quiet_window_ms),
                mute_cooldown: Duration::from_millis(args.mute_cooldown_ms),
            },
            queue_capacity: args.queue_capacity as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_throttle_policy() {
        // テスト項目: 引数なしの設定は既定のスロットル設定になる
        // given (前提条件):
        let args = ServerArgs::try_parse_from(["murmur-server"]).unwrap();

        // when (操作):
        let config = ServerConfig::from(args);

        // then (期待する結果):
        assert_eq!(config.throttle, ThrottlePolicy::default());
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY as usize);
        assert_eq!(config.port, 8080);
        assert_eq!(config.database, None);
    }

    #[test]
    fn test_custom_throttle_arguments() {
        // テスト項目: コマンドライン引数でスロットル設定を変更できる
        // given (前提条件):
        let args = ServerArgs::try_parse_from([
            "murmur-server",
            "--burst-limit",
            "5",
            "--quiet-window-ms",
            "500",
            "--mute-cooldown-ms",
            "1500",
            "--database",
            "chat.db",
        ])
        .unwrap();

        // when (操作):
        let config = ServerConfig::from(args);

        // then (期待する結果):
        assert_eq!(config.throttle.burst_limit, 5);
        assert_eq!(config.throttle.quiet_window, Duration::from_millis(500));
        assert_eq!(config.throttle.mute_cooldown, Duration::from_millis(1500));
        assert_eq!(config.database, Some(PathBuf::from("chat.db")));
    }

    #[test]
    fn test_zero_burst_limit_is_rejected() {
        // テスト項目: burst limit と キュー容量に 0 は指定できない
        // when (操作):
        let burst = ServerArgs::try_parse_from(["murmur-server", "--burst-limit", "0"]);
        let queue = ServerArgs::try_parse_from(["murmur-server", "--queue-capacity", "0"]);

        // then (期待する結果):
        assert!(burst.is_err());
        assert!(queue.is_err());
    }
}
