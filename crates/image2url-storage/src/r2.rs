use std::borrow::Cow;
use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use image2url_core::R2Config;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, GetOptions, ObjectStore, PutOptions, PutPayload,
    Result as ObjectResult,
};

use crate::traits::{
    join_public_url, stamp_upload_time, ObjectInfo, PutOutcome, Storage, StorageError,
    StorageResult, CACHE_CONTROL,
};

/// R2 accepts any region string; `auto` is the documented value.
const R2_REGION: &str = "auto";

/// Cloudflare R2 storage, reached through its S3-compatible API
#[derive(Debug, Clone)]
pub struct R2Storage {
    store: AmazonS3,
    bucket: String,
    public_base: String,
}

impl R2Storage {
    /// Create a new R2Storage instance
    ///
    /// The endpoint is `https://{account_id}.r2.cloudflarestorage.com` unless
    /// `R2_ENDPOINT` overrides it (plain `http://` endpoints are allowed for local
    /// S3-compatible servers).
    pub fn new(config: &R2Config) -> StorageResult<Self> {
        let endpoint = config.endpoint_url();
        let allow_http = endpoint.starts_with("http://");

        let store = AmazonS3Builder::new()
            .with_region(R2_REGION)
            .with_bucket_name(config.bucket_name.clone())
            .with_endpoint(endpoint)
            .with_allow_http(allow_http)
            .with_access_key_id(config.access_key_id.clone())
            .with_secret_access_key(config.secret_access_key.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(R2Storage {
            store,
            bucket: config.bucket_name.clone(),
            public_base: config.public_url.trim_end_matches('/').to_string(),
        })
    }

    fn put_attributes(content_type: &str, metadata: &BTreeMap<String, String>) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        attributes.insert(Attribute::CacheControl, CACHE_CONTROL.into());
        for (name, value) in metadata {
            attributes.insert(
                Attribute::Metadata(Cow::Owned(name.clone())),
                value.clone().into(),
            );
        }
        attributes
    }

    /// Object location for `key`, taken verbatim. Keys object_store cannot
    /// hold as-is (empty or `.`/`..` segments) are rejected instead of rewritten.
    fn location(key: &str) -> StorageResult<Path> {
        Path::parse(key).map_err(|e| StorageError::InvalidKey(format!("{}: {}", key, e)))
    }
}

#[async_trait]
impl Storage for R2Storage {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        metadata: &BTreeMap<String, String>,
    ) -> StorageResult<PutOutcome> {
        let size = data.len() as u64;
        let location = Self::location(key)?;
        let tags = stamp_upload_time(metadata, Utc::now());
        let options = PutOptions {
            attributes: Self::put_attributes(content_type, &tags),
            ..Default::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(data), options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "R2 upload failed"
            );
            StorageError::WriteFailed(e.to_string())
        })?;

        let url = self.public_url(key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "R2 upload successful"
        );

        Ok(PutOutcome {
            key: key.to_string(),
            url,
        })
    }

    async fn head(&self, key: &str) -> StorageResult<ObjectInfo> {
        let location = Self::location(key)?;
        let options = GetOptions {
            head: true,
            ..Default::default()
        };
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self.store.get_opts(&location, options).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "R2 head failed"
                );
                StorageError::ReadFailed(other.to_string())
            }
        })?;

        let attribute = |name: &Attribute| result.attributes.get(name).map(|v| v.to_string());
        let metadata = result
            .attributes
            .iter()
            .filter_map(|(name, value)| match name {
                Attribute::Metadata(tag) => Some((tag.to_string(), value.to_string())),
                _ => None,
            })
            .collect();

        tracing::debug!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = result.meta.size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "R2 head successful"
        );

        Ok(ObjectInfo {
            size: Some(result.meta.size),
            content_type: attribute(&Attribute::ContentType),
            cache_control: attribute(&Attribute::CacheControl),
            last_modified: Some(result.meta.last_modified),
            metadata,
        })
    }

    fn public_url(&self, key: &str) -> String {
        join_public_url(&self.public_base, key)
    }
}
