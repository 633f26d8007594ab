//! Test helpers: build `ImageTools` over in-memory storage and a scripted remote.
//!
//! Run from workspace root: `cargo test -p image2url-mcp`.

pub mod fixtures;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image2url_core::{Config, RemoteImageClient, RemoteResponse, ToolError, ToolResult};
use image2url_mcp::{ImageService, ImageTools};
use image2url_storage::MemoryStorage;

pub const PUBLIC_BASE: &str = "https://cdn.example.com";

/// Remote client answering from a fixed table of URLs
#[derive(Default)]
pub struct ScriptedRemote {
    responses: Mutex<HashMap<String, RemoteResponse>>,
    get_calls: AtomicUsize,
    head_calls: AtomicUsize,
}

impl ScriptedRemote {
    pub fn respond(&self, url: &str, response: RemoteResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, url: &str) -> ToolResult<RemoteResponse> {
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| ToolError::Fetch {
                status: None,
                reason: format!("connection refused: {}", url),
            })
    }
}

#[async_trait]
impl RemoteImageClient for ScriptedRemote {
    async fn get(&self, url: &str) -> ToolResult<RemoteResponse> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(url)
    }

    async fn head(&self, url: &str) -> ToolResult<RemoteResponse> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(url).map(|mut response| {
            response.body = Default::default();
            response
        })
    }
}

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("R2_ACCOUNT_ID", "test-account"),
        ("R2_ACCESS_KEY_ID", "test-key"),
        ("R2_SECRET_ACCESS_KEY", "test-secret"),
        ("R2_BUCKET_NAME", "test-bucket"),
        ("R2_PUBLIC_URL", PUBLIC_BASE),
        ("MCP_DOMAIN", "mcp.example.com"),
    ]);
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap()
}

pub struct TestApp {
    pub tools: ImageTools,
    pub storage: Arc<MemoryStorage>,
    pub remote: Arc<ScriptedRemote>,
}

impl TestApp {
    pub fn service(&self) -> ImageService {
        ImageService::new(self.tools.clone())
    }
}

pub fn setup_test_app() -> TestApp {
    let storage = Arc::new(MemoryStorage::new(PUBLIC_BASE));
    let remote = Arc::new(ScriptedRemote::default());
    let tools = ImageTools::new(storage.clone(), remote.clone(), Arc::new(test_config()));

    TestApp {
        tools,
        storage,
        remote,
    }
}
