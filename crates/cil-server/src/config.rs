use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Configuration for the chain API server.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Capacity of per-subscriber event channels.
    pub channel_capacity: usize,
    /// Append a bootstrap genesis block when the chain is empty at startup.
    pub bootstrap_genesis: bool,
    /// Exact CORS origin to allow; `None` allows any origin (the explorer
    /// is a browser consumer on a different origin).
    pub allow_origin: Option<String>,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9318".parse().expect("static socket addr"),
            channel_capacity: 1024,
            bootstrap_genesis: true,
            allow_origin: None,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| ServerError::Config(e.to_string()))
    }
}
