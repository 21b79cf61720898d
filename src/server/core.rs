use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use crate::client::ChatRegistry;
use crate::protocol::{Response, handle_request, parse_request};
use crate::server::config::ServerConfig;

pub struct Server {
    registry: Arc<ChatRegistry>,
    listener: TcpListener,
}

impl Server {
    pub async fn new(config: &ServerConfig) -> Self {
        let bind_addr = config.bind_addr();
        let listener = match TcpListener::bind(&bind_addr).await {
            Ok(listener) => {
                info!("Server bound to {}", bind_addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", bind_addr, e);
                panic!("Server startup failed on socket {}: {}", bind_addr, e);
            }
        };

        Self {
            registry: Arc::new(ChatRegistry::new(
                config.mailbox_capacity,
                config.max_clients,
            )),
            listener,
        }
    }

    /// Address the listener actually bound to (port 0 resolves here).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn start(&self) {
        if let Ok(addr) = self.local_addr() {
            info!("Starting Rax chat server on {}", addr);
        }

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let registry = Arc::clone(&self.registry);

                    // Spawn a task for each connection so the accept loop
                    // doesn't block. A connection blocked in receive stalls
                    // only itself.
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, addr, registry).await {
                            warn!("Connection {} ended with error: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Runs one connection's request/response loop until EOF.
///
/// Closing the connection does not disconnect any registered id; clients
/// leave the registry only through an explicit disconnect request.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    registry: Arc<ChatRegistry>,
) -> Result<(), std::io::Error> {
    info!("Connection from {}", addr);

    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            info!("Connection {} closed", addr);
            return Ok(());
        }

        let response = match parse_request(&line) {
            Ok(request) => handle_request(&registry, request).await,
            Err(e) => {
                warn!("Bad request from {}: {}", addr, e);
                Response::error(e)
            }
        };

        let mut payload = serde_json::to_string(&response)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        payload.push('\n');

        reader.get_mut().write_all(payload.as_bytes()).await?;
        reader.get_mut().flush().await?;
    }
}
