//! In-memory storage backend for tests

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::traits::{
    join_public_url, stamp_upload_time, ObjectInfo, PutOutcome, Storage, StorageError,
    StorageResult, CACHE_CONTROL,
};

/// An object held by [`MemoryStorage`]
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
    pub metadata: BTreeMap<String, String>,
    pub last_modified: DateTime<Utc>,
}

/// Storage that keeps objects in a map and counts calls, so tests can assert
/// that rejected requests never reach the backend.
pub struct MemoryStorage {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    public_base: String,
    put_calls: AtomicUsize,
    head_calls: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new(public_base: &str) -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            public_base: public_base.trim_end_matches('/').to_string(),
            put_calls: AtomicUsize::new(0),
            head_calls: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `put` fail with a write error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed an object directly, bypassing the call counters.
    pub fn insert(&self, key: &str, data: impl Into<Bytes>, content_type: &str) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data: data.into(),
                content_type: content_type.to_string(),
                metadata: BTreeMap::new(),
                last_modified: Utc::now(),
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new("https://example.com")
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
        metadata: &BTreeMap<String, String>,
    ) -> StorageResult<PutOutcome> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed("simulated write failure".to_string()));
        }

        let now = Utc::now();
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                metadata: stamp_upload_time(metadata, now),
                last_modified: now,
            },
        );

        Ok(PutOutcome {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }

    async fn head(&self, key: &str) -> StorageResult<ObjectInfo> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);

        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|object| ObjectInfo {
                size: Some(object.data.len() as u64),
                content_type: Some(object.content_type.clone()),
                cache_control: Some(CACHE_CONTROL.to_string()),
                last_modified: Some(object.last_modified),
                metadata: object.metadata.clone(),
            })
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn public_url(&self, key: &str) -> String {
        join_public_url(&self.public_base, key)
    }
}
