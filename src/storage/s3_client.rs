use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};
use tracing::{debug, warn};

use super::{ObjectStore, StoreError, StoreResult};
use crate::config::StorageConfig;

/// S3-compatible backend bound to one bucket.
pub struct S3ObjectStore {
    bucket: Arc<Bucket>,
    name: String,
}

impl From<S3Error> for StoreError {
    fn from(err: S3Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl S3ObjectStore {
    /// Custom endpoints (MinIO, LocalStack) are addressed path-style.
    pub fn new(config: &StorageConfig) -> StoreResult<Self> {
        let region = match &config.s3_endpoint {
            Some(endpoint) => Region::Custom {
                region: config.s3_region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config.s3_region.parse::<Region>().map_err(|e| {
                StoreError::Backend(format!("invalid region '{}': {}", config.s3_region, e))
            })?,
        };

        let credentials = Credentials::new(
            config.s3_access_key_id.as_deref(),
            config.s3_secret_access_key.as_deref(),
            None,
            config.s3_session_token.as_deref(),
            None,
        )
        .map_err(|e| StoreError::Backend(format!("failed to load S3 credentials: {}", e)))?;

        let bucket = Bucket::new(&config.s3_bucket, region, credentials)?;
        let bucket: Arc<Bucket> = if config.s3_endpoint.is_some() {
            Arc::from(bucket.with_path_style())
        } else {
            Arc::from(bucket)
        };

        Ok(Self {
            bucket,
            name: config.s3_bucket.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn bucket(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Bytes>> {
        match self.bucket.get_object(key).await {
            Ok(response) => match response.status_code() {
                404 => Ok(None),
                200..=299 => Ok(Some(Bytes::copy_from_slice(response.bytes()))),
                status => Err(StoreError::Backend(format!(
                    "GET {} returned HTTP {}",
                    key, status
                ))),
            },
            Err(S3Error::HttpFailWithBody(404, _)) => {
                debug!(bucket = %self.name, key, "object not found");
                Ok(None)
            }
            Err(e) => {
                warn!(bucket = %self.name, key, error = %e, "S3 get failed");
                Err(e.into())
            }
        }
    }

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> StoreResult<()> {
        let response = self
            .bucket
            .put_object_with_content_type(key, &body, content_type)
            .await?;
        match response.status_code() {
            200..=299 => Ok(()),
            status => Err(StoreError::Backend(format!(
                "PUT {} returned HTTP {}",
                key, status
            ))),
        }
    }

    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let pages = self.bucket.list(prefix.to_string(), None).await?;
        Ok(pages
            .into_iter()
            .flat_map(|page| page.contents.into_iter().map(|object| object.key))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageProvider;

    fn config_for(endpoint: &str) -> StorageConfig {
        StorageConfig {
            provider: StorageProvider::S3,
            s3_bucket: "people".to_string(),
            s3_access_key_id: Some("test-access".to_string()),
            s3_secret_access_key: Some("test-secret".to_string()),
            s3_endpoint: Some(endpoint.to_string()),
            ..StorageConfig::default()
        }
    }

    #[tokio::test]
    async fn test_missing_object_is_none() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/people/personas.csv")
            .with_status(404)
            .with_header("content-type", "application/xml")
            .with_body("<Error><Code>NoSuchKey</Code></Error>")
            .create_async()
            .await;

        let store = S3ObjectStore::new(&config_for(&server.url())).unwrap();
        assert!(store.get("personas.csv").await.unwrap().is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_returns_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/people/personas.csv")
            .with_status(200)
            .with_body("name,age,height,registered_at\n")
            .create_async()
            .await;

        let store = S3ObjectStore::new(&config_for(&server.url())).unwrap();
        let body = store.get("personas.csv").await.unwrap().unwrap();
        assert_eq!(&body[..], b"name,age,height,registered_at\n");
    }

    #[tokio::test]
    async fn test_access_denied_is_backend_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/people/personas.csv")
            .with_status(403)
            .with_body("<Error><Code>AccessDenied</Code></Error>")
            .create_async()
            .await;

        let store = S3ObjectStore::new(&config_for(&server.url())).unwrap();
        let err = store.get("personas.csv").await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn test_put_sends_object() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/people/personas.csv")
            .with_status(200)
            .create_async()
            .await;

        let store = S3ObjectStore::new(&config_for(&server.url())).unwrap();
        store
            .put(
                "personas.csv",
                Bytes::from_static(b"name,age,height,registered_at\n"),
                "text/csv; charset=utf-8",
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_bucket_name_is_configured() {
        let store = S3ObjectStore::new(&config_for("http://127.0.0.1:9000")).unwrap();
        assert_eq!(store.bucket(), "people");
    }
}
