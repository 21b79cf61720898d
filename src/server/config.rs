//! Server configuration
//!
//! Manages server configuration settings and loading.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Server configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_clients: usize,
    pub mailbox_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 42586,
            max_clients: 64,
            mailbox_capacity: 20,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `rax-chat.toml` (if present) with
    /// `RAX_CHAT_*` environment variable overrides on top of the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();
        Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port as u64)?
            .set_default("max_clients", defaults.max_clients as u64)?
            .set_default("mailbox_capacity", defaults.mailbox_capacity as u64)?
            .add_source(File::with_name("rax-chat").required(false))
            .add_source(Environment::with_prefix("RAX_CHAT"))
            .build()?
            .try_deserialize()
    }

    /// Socket address string the listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_capacity() {
        let config = ServerConfig::default();
        assert_eq!(config.mailbox_capacity, 20);
        assert_eq!(config.bind_addr(), "0.0.0.0:42586");
    }
}
