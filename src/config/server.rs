//! HTTP listener configuration.

use super::camera::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Environment variable overriding the HTTP listen port.
pub const ENV_PORT: &str = "PORT";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3001;

/// Configuration for the capture HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], DEFAULT_PORT).into(),
        }
    }
}

impl ServerConfig {
    /// Creates a config listening on all interfaces at the given port.
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], port).into(),
        }
    }

    /// Resolves the listen port from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the listen port through an arbitrary string lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match lookup(ENV_PORT) {
            Some(value) => {
                let port: u16 = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort(value.clone()))?;
                if port == 0 {
                    return Err(ConfigError::InvalidPort(value));
                }
                Ok(Self::with_port(port))
            }
            None => Ok(Self::default()),
        }
    }
}
