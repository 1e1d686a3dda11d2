//! Infrastructure layer: wire DTOs, the connection registry and storage backends.

pub mod dto;
pub mod message_pusher;
pub mod repository;
