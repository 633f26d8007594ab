//! Deep health check: a real write against storage.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::Utc;
use image2url_core::constants::SERVER_VERSION;
use image2url_core::{iso_timestamp, ToolError};
use image2url_storage::keys::health_probe_key;
use serde::Serialize;
use sysinfo::System;

use super::ImageTools;

const PROBE_BODY: &[u8] = b"health check";
const PROBE_CONTENT_TYPE: &str = "text/plain";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub mcp_server: &'static str,
    pub r2_storage: &'static str,
    pub upload_capability: &'static str,
}

/// Resident and virtual memory of this process, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryUsage {
    pub rss: u64,
    pub virtual_memory: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: String,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub services: ServiceStatus,
    /// Seconds since the handlers were created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<MemoryUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl ImageTools {
    /// Probe storage with a small write. Never fails; a broken backend is
    /// reported as an unhealthy result.
    pub async fn health_check(&self) -> HealthReport {
        let key = health_probe_key(Utc::now().timestamp_millis());
        let metadata = BTreeMap::from([("health-check".to_string(), "true".to_string())]);

        let probe = self
            .storage
            .put(
                &key,
                Bytes::from_static(PROBE_BODY),
                PROBE_CONTENT_TYPE,
                &metadata,
            )
            .await;

        match probe {
            Ok(_) => HealthReport {
                status: HealthStatus::Healthy,
                timestamp: iso_timestamp(Utc::now()),
                version: SERVER_VERSION,
                error: None,
                services: ServiceStatus {
                    mcp_server: "online",
                    r2_storage: "connected",
                    upload_capability: "functional",
                },
                uptime: Some(self.started_at.elapsed().as_secs_f64()),
                memory_usage: current_memory_usage(),
                domain: Some(self.config.domain.clone()),
            },
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Health check probe failed");
                HealthReport {
                    status: HealthStatus::Unhealthy,
                    timestamp: iso_timestamp(Utc::now()),
                    version: SERVER_VERSION,
                    error: Some(ToolError::from(e).to_string()),
                    services: ServiceStatus {
                        mcp_server: "online",
                        r2_storage: "disconnected",
                        upload_capability: "failed",
                    },
                    uptime: None,
                    memory_usage: None,
                    domain: None,
                }
            }
        }
    }
}

fn current_memory_usage() -> Option<MemoryUsage> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    system.refresh_process(pid);
    system.process(pid).map(|process| MemoryUsage {
        rss: process.memory(),
        virtual_memory: process.virtual_memory(),
    })
}
