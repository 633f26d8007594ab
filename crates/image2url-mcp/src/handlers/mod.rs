//! Tool handlers
//!
//! [`ImageTools`] holds everything a tool invocation needs and knows nothing about
//! the transport in front of it. The rmcp service in `server` adapts it to MCP.

mod health;
mod info;
mod upload;

use std::sync::Arc;
use std::time::Instant;

use image2url_core::{Config, RemoteImageClient};
use image2url_storage::Storage;

pub use health::{HealthReport, HealthStatus, MemoryUsage, ServiceStatus};

#[derive(Clone)]
pub struct ImageTools {
    storage: Arc<dyn Storage>,
    remote: Arc<dyn RemoteImageClient>,
    config: Arc<Config>,
    started_at: Instant,
}

impl ImageTools {
    pub fn new(
        storage: Arc<dyn Storage>,
        remote: Arc<dyn RemoteImageClient>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            storage,
            remote,
            config,
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
