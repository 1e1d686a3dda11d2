//! Repository の具体的な実装
//!
//! - `inmemory`: プロセス内のみで保持（再起動で消える）
//! - `sqlite`: SQLite ファイルへの永続化

pub mod inmemory;
pub mod sqlite;

pub use inmemory::{InMemoryMessageStore, InMemoryUserRepository};
pub use sqlite::{Database, SqliteMessageStore, SqliteUserRepository};
