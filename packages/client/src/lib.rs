//! Terminal chat client for the Murmur chat server.

mod domain;
pub mod error;
mod formatter;
mod registration;
mod runner;
mod session;
mod ui;

pub use runner::{ClientOptions, run_client};
