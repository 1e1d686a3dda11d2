mod http;
mod websocket;

pub use http::{get_messages, health_check, register_user};
pub use websocket::websocket_handler;
