//! Object storage layer.
//!
//! The record stores only ever talk to an [`ObjectStore`]: whole-object
//! reads, whole-object writes and key listings against a single bucket.
//! `S3ObjectStore` is the production backend; `MemoryObjectStore` keeps
//! objects in process for local runs and tests.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::config::{StorageConfig, StorageProvider};

pub mod memory;
pub mod s3_client;

pub use memory::MemoryObjectStore;
pub use s3_client::S3ObjectStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Backend(String),

    #[error("{operation} timed out after {millis} ms")]
    Timeout { operation: &'static str, millis: u64 },

    #[error("stored data is unreadable: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket this store is bound to.
    fn bucket(&self) -> &str;

    /// Fetch a whole object. A missing key is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> StoreResult<Option<Bytes>>;

    /// Create or overwrite a whole object.
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> StoreResult<()>;

    /// Every key in the bucket starting with `prefix` (`""` lists everything).
    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>>;
}

/// Bound a store call so a slow or unreachable backend surfaces as an error.
pub async fn with_timeout<T>(
    limit: Duration,
    operation: &'static str,
    call: impl Future<Output = StoreResult<T>>,
) -> StoreResult<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout {
            operation,
            millis: limit.as_millis() as u64,
        }),
    }
}

/// Build the backend selected by configuration.
pub fn connect(config: &StorageConfig) -> StoreResult<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config.provider {
        StorageProvider::S3 => Arc::new(S3ObjectStore::new(config)?),
        StorageProvider::Memory => Arc::new(MemoryObjectStore::new(config.s3_bucket.clone())),
    };
    info!(provider = %config.provider, bucket = %store.bucket(), "Object store ready");
    Ok(store)
}
