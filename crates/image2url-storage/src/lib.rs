//! Image2URL Storage Library
//!
//! This crate provides the [`Storage`] abstraction used by the tool handlers and
//! its Cloudflare R2 implementation.
//!
//! # Storage key format
//!
//! - **Uploads**: `images/{generated_base_name}.{extension}`
//! - **Health probes**: `temp/health-check-{unix_millis}.txt`
//!
//! Public URLs are always `{R2_PUBLIC_URL}/{key}`. Key construction lives in the
//! `keys` module so handlers and backends agree on the layout.

pub mod keys;
#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;
pub mod r2;
pub mod traits;

// Re-export commonly used types
#[cfg(any(test, feature = "test-helpers"))]
pub use memory::MemoryStorage;
pub use r2::R2Storage;
pub use traits::{ObjectInfo, PutOutcome, Storage, StorageError, StorageResult};
