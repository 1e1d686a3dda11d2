//! Terminal chat client with registration and reconnection support.
//!
//! Connects to a Murmur chat server and sends each typed line as a message.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//! An unknown token or a taken name ends the client immediately.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin murmur-client -- --name alice
//! cargo run --bin murmur-client -- --token <token-from-an-earlier-run>
//! ```

use clap::Parser;

use murmur_client::{ClientOptions, run_client};
use murmur_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "murmur-client")]
#[command(about = "Terminal client for the Murmur chat server", long_about = None)]
struct Args {
    /// Register a new user with this display name
    #[arg(short = 'n', long, required_unless_present = "token", conflicts_with = "token")]
    name: Option<String>,

    /// Access token of an existing user
    #[arg(short = 't', long, env = "MURMUR_TOKEN")]
    token: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

impl Args {
    fn into_options(self) -> ClientOptions {
        match (self.token, self.name) {
            (Some(token), _) => ClientOptions::Token {
                url: self.url,
                token,
            },
            (None, name) => ClientOptions::Register {
                url: self.url,
                name: name.unwrap_or_default(),
            },
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = run_client(args.into_options()).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
