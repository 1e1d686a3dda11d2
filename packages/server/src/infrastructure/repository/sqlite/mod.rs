//! SQLite を使った永続化
//!
//! 1 つの `Database`（接続）を MessageStore と UserRepository で共有します。
//! rusqlite はブロッキング API のため、クエリは `spawn_blocking` 上で実行します。

mod database;
mod message_store;
mod user;

pub use database::{Database, DatabaseError};
pub use message_store::SqliteMessageStore;
pub use user::SqliteUserRepository;
