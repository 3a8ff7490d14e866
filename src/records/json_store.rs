use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::config::CountScope;
use crate::models::{PersonaInput, PersonaRecord};
use crate::storage::{with_timeout, ObjectStore, StoreError, StoreResult};

const JSON_CONTENT_TYPE: &str = "application/json";
const JSON_EXTENSION: &str = ".json";

/// `<prefix>_<YYYYMMDD_HHMMSS>_<id>.json`
pub fn object_key(prefix: &str, at: DateTime<Utc>, id: Uuid) -> String {
    format!("{}_{}_{}{}", prefix, at.format("%Y%m%d_%H%M%S"), id, JSON_EXTENSION)
}

/// One JSON object per persona.
///
/// Keys never collide because each carries a fresh v4 UUID; nothing checks
/// for an existing object before writing.
pub struct JsonRecordStore {
    store: Arc<dyn ObjectStore>,
    prefix: String,
    scope: CountScope,
    timeout: Duration,
}

impl JsonRecordStore {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        prefix: impl Into<String>,
        scope: CountScope,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            scope,
            timeout,
        }
    }

    pub fn bucket(&self) -> &str {
        self.store.bucket()
    }

    /// Write a new object for `input` and return its key with the saved record.
    pub async fn insert(&self, input: PersonaInput) -> StoreResult<(String, PersonaRecord)> {
        let now = Utc::now();
        let record = PersonaRecord::new(input, Uuid::new_v4(), now);
        let key = object_key(&self.prefix, now, record.id);

        let body = serde_json::to_vec_pretty(&record)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        with_timeout(
            self.timeout,
            "put",
            self.store.put(&key, Bytes::from(body), JSON_CONTENT_TYPE),
        )
        .await?;

        info!(bucket = %self.bucket(), key = %key, "Persona stored");
        Ok((key, record))
    }

    pub async fn count_all(&self) -> StoreResult<usize> {
        match self.scope {
            CountScope::Bucket => {
                let keys = with_timeout(self.timeout, "list", self.store.list("")).await?;
                Ok(keys.len())
            }
            CountScope::Prefix => {
                let prefix = format!("{}_", self.prefix);
                let keys = with_timeout(self.timeout, "list", self.store.list(&prefix)).await?;
                Ok(keys.iter().filter(|key| key.ends_with(JSON_EXTENSION)).count())
            }
        }
    }
}
