//! Record stores: the two persistence strategies over an [`ObjectStore`].
//!
//! - [`CsvRecordStore`] keeps every person in one CSV object and rewrites it
//!   in full on each append.
//! - [`JsonRecordStore`] writes one JSON object per persona and counts by
//!   listing keys.
//!
//! [`ObjectStore`]: crate::storage::ObjectStore

pub mod csv_store;
pub mod json_store;

pub use csv_store::CsvRecordStore;
pub use json_store::{object_key, JsonRecordStore};
