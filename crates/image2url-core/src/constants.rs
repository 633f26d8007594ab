//! Process-wide constants

/// Name reported to MCP clients and in health payloads.
pub const SERVER_NAME: &str = "image2url";

/// Version reported in health payloads and server info.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent sent when fetching remote images.
pub const USER_AGENT: &str = "Image2URL-MCP-Server/1.0";

/// Timeout applied to every outbound HTTP request made by the remote client.
pub const REMOTE_TIMEOUT_SECS: u64 = 60;

/// Default port for the HTTP transport.
pub const DEFAULT_HTTP_PORT: u16 = 3001;

/// Prefix for uploaded images.
pub const IMAGES_PREFIX: &str = "images";

/// Prefix for health probe objects.
pub const TEMP_PREFIX: &str = "temp";
