//! Mafia game server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin mafia-server -- --port 3001
//! ```

use clap::Parser;
use mafia_server::ServerConfig;
use mafia_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Run the server
    if let Err(e) = mafia_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
