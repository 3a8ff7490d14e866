use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::debug;

use super::{ObjectStore, StoreResult};

/// In-process object store.
///
/// `latency` delays every call after its snapshot is taken (reads) or before
/// it is applied (writes), which makes request interleavings reproducible.
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    bucket: String,
    objects: Arc<RwLock<BTreeMap<String, Bytes>>>,
    latency: Duration,
}

impl MemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Bytes>> {
        let snapshot = self.objects.read().await.get(key).cloned();
        self.pause().await;
        Ok(snapshot)
    }

    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> StoreResult<()> {
        self.pause().await;
        debug!(bucket = %self.bucket, key, size = body.len(), "memory put");
        self.objects.write().await.insert(key.to_string(), body);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let keys = self
            .objects
            .read()
            .await
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        self.pause().await;
        Ok(keys)
    }
}
