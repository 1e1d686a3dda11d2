//! Murmur chat server library.
//!
//! A single-room realtime chat core: spam muting per author, broadcast of
//! messages and typing indicators to live WebSocket connections, and an
//! append-only message store.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
