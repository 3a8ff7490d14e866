use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use csv::{ReaderBuilder, WriterBuilder};
use tracing::{debug, info};

use crate::models::{PersonInput, PersonRow};
use crate::storage::{with_timeout, ObjectStore, StoreError, StoreResult};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// All persons in a single CSV object.
///
/// `append` is a read-modify-write with no precondition on the overwrite.
/// Two appends that both read before either writes leave only one of the
/// new rows behind (lost update); nothing in the service serializes them.
pub struct CsvRecordStore {
    store: Arc<dyn ObjectStore>,
    key: String,
    timeout: Duration,
}

impl CsvRecordStore {
    pub fn new(store: Arc<dyn ObjectStore>, key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            timeout,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Every stored row in file order. A missing or blank object reads as empty.
    pub async fn read_all(&self) -> StoreResult<Vec<PersonRow>> {
        let body = with_timeout(self.timeout, "get", self.store.get(&self.key)).await?;
        match body {
            Some(body) => decode_rows(&body),
            None => {
                debug!(key = %self.key, "CSV object missing, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the object with `rows`. An empty slice writes the header only.
    pub async fn write_all(&self, rows: &[PersonRow]) -> StoreResult<()> {
        let body = encode_rows(rows)?;
        with_timeout(
            self.timeout,
            "put",
            self.store.put(&self.key, body, CSV_CONTENT_TYPE),
        )
        .await
    }

    /// Append one person and return the new row count.
    pub async fn append(&self, input: PersonInput) -> StoreResult<usize> {
        let mut rows = self.read_all().await?;
        rows.push(PersonRow::new(input, Utc::now()));
        self.write_all(&rows).await?;

        info!(key = %self.key, rows = rows.len(), "Person appended");
        Ok(rows.len())
    }

    pub async fn count(&self) -> StoreResult<usize> {
        Ok(self.read_all().await?.len())
    }
}

fn decode_rows(body: &[u8]) -> StoreResult<Vec<PersonRow>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body)
        .deserialize()
        .collect::<Result<Vec<PersonRow>, csv::Error>>()
        .map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn encode_rows(rows: &[PersonRow]) -> StoreResult<Bytes> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    let encode_err = |e: csv::Error| StoreError::Corrupt(e.to_string());
    writer.write_record(PersonRow::FIELDS).map_err(encode_err)?;
    for row in rows {
        writer.serialize(row).map_err(encode_err)?;
    }

    writer
        .into_inner()
        .map(Bytes::from)
        .map_err(|e| StoreError::Corrupt(e.to_string()))
}
