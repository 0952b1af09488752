use super::{parse_var, Lookup};
use crate::core::Result;

/// Server configuration for HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            workers: default_workers(),
        }
    }

    pub(super) fn from_lookup(lookup: &Lookup<'_>) -> Result<Self> {
        let mut config = Self::new(
            lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            parse_var(lookup, "SERVER_PORT", 8080)?,
        );
        config.workers = parse_var(lookup, "SERVER_WORKERS", config.workers)?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
