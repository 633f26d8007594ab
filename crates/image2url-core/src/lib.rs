//! Image2URL Core Library
//!
//! This crate provides the configuration, error taxonomy and the image ingestion
//! logic (content classification, filename generation, payload resolution) shared
//! by the storage and MCP crates.

pub mod classify;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod naming;
pub mod payload;
pub mod remote;

// Re-export commonly used types
pub use classify::{
    extension_for, is_allowed_image_type, mime_for, normalize_content_type, ALLOWED_IMAGE_TYPES,
};
pub use config::{Config, R2Config};
pub use error::{ErrorMetadata, LogLevel, ToolError, ToolResult};
pub use models::{
    http_date, iso_timestamp, ImageInfoResponse, UploadRequest, UploadResponse, UploadSource,
};
pub use naming::{generate_base_name, strip_extension};
pub use payload::{format_file_size, ImagePayload, MAX_INLINE_IMAGE_BYTES};
pub use remote::{HttpRemoteClient, RemoteImageClient, RemoteResponse};
