//! RAX Chat Server - Entry Point
//!
//! A real-time chat relay server: clients register, broadcast messages,
//! and pull messages addressed to everyone else.

use log::{error, info};

use rax_chat_server::Server;
use rax_chat_server::server::ServerConfig;

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching chat server...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let server = Server::new(&config).await;
    server.start().await;
}
