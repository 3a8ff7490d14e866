use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::records::{CsvRecordStore, JsonRecordStore};
use crate::storage::ObjectStore;
use crate::validation::{validate_email_shape, validate_phone};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub csv_store: Arc<CsvRecordStore>,
    pub json_store: Arc<JsonRecordStore>,
}

impl AppState {
    /// Wire both record stores onto one backend using the storage config.
    pub fn new(config: Config, backend: Arc<dyn ObjectStore>) -> Self {
        let storage = &config.storage;
        let csv_store = CsvRecordStore::new(
            backend.clone(),
            storage.csv_object_key.clone(),
            storage.timeout(),
        );
        let json_store = JsonRecordStore::new(
            backend,
            storage.record_prefix.clone(),
            storage.count_scope,
            storage.timeout(),
        );

        Self {
            config,
            csv_store: Arc::new(csv_store),
            json_store: Arc::new(json_store),
        }
    }
}

/// ISO-8601 registration timestamp as stored in both layouts.
pub fn registration_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// Single-file records

/// Body of `POST /person`. Age 0 is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PersonInput {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(range(min = 0, exclusive_max = 150, message = "age must be in [0, 150)"))]
    pub age: i64,
    #[validate(range(exclusive_min = 0.0, message = "height must be greater than 0"))]
    pub height: f64,
}

/// One line of the CSV object.
///
/// Field order here is the column order on disk and must match [`PersonRow::FIELDS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRow {
    pub name: String,
    pub age: i64,
    pub height: f64,
    pub registered_at: String,
}

impl PersonRow {
    pub const SCHEMA_VERSION: u32 = 1;
    pub const FIELDS: [&'static str; 4] = ["name", "age", "height", "registered_at"];

    pub fn new(input: PersonInput, registered_at: DateTime<Utc>) -> Self {
        Self {
            name: input.name,
            age: input.age,
            height: input.height,
            registered_at: registration_timestamp(registered_at),
        }
    }
}

// Multi-file records

/// Body of `POST /insert`. Age must be strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PersonaInput {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(range(exclusive_min = 0, exclusive_max = 150, message = "age must be in (0, 150)"))]
    pub age: i64,
    #[validate(custom(function = "validate_email_shape"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(min = 1, max = 100, message = "city must be 1 to 100 characters"))]
    pub city: String,
}

/// The JSON document written for one persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaRecord {
    pub id: Uuid,
    pub name: String,
    pub age: i64,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub registered_at: String,
}

impl PersonaRecord {
    pub fn new(input: PersonaInput, id: Uuid, registered_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            age: input.age,
            email: input.email,
            phone: input.phone,
            city: input.city,
            registered_at: registration_timestamp(registered_at),
        }
    }
}

// Responses

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPersonResponse {
    pub message: String,
    pub total_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonCountResponse {
    pub row_count: usize,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertResponse {
    pub message: String,
    pub file: String,
    /// `None` when the object was written but the follow-up listing failed.
    pub total_file_count: Option<usize>,
    pub saved_data: PersonaRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCountResponse {
    pub file_count: usize,
    pub bucket_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(age: i64) -> PersonInput {
        PersonInput {
            name: "Ana".to_string(),
            age,
            height: 1.65,
        }
    }

    fn persona(age: i64) -> PersonaInput {
        PersonaInput {
            name: "Luis".to_string(),
            age,
            email: "luis@example.com".to_string(),
            phone: "+57 300-1234".to_string(),
            city: "Medellin".to_string(),
        }
    }

    #[test]
    fn test_person_age_lower_bound_inclusive() {
        assert!(person(0).validate().is_ok());
        assert!(person(-1).validate().is_err());
    }

    #[test]
    fn test_person_age_upper_bound_exclusive() {
        assert!(person(149).validate().is_ok());
        let errors = person(150).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("age"));
    }

    #[test]
    fn test_persona_age_lower_bound_exclusive() {
        assert!(persona(0).validate().is_err());
        assert!(persona(1).validate().is_ok());
        assert!(persona(149).validate().is_ok());
        assert!(persona(150).validate().is_err());
    }

    #[test]
    fn test_person_height_must_be_positive() {
        let mut input = person(30);
        input.height = 0.0;
        assert!(input.validate().is_err());
        input.height = 0.01;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_name_length_counts_characters() {
        let mut input = person(30);
        input.name = "ñ".repeat(100);
        assert!(input.validate().is_ok());
        input.name = "ñ".repeat(101);
        assert!(input.validate().is_err());
        input.name = String::new();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_persona_format_errors_are_per_field() {
        let mut input = persona(30);
        input.email = "no-at-sign.com".to_string();
        input.phone = "12-34a".to_string();
        input.city = String::new();

        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("phone"));
        assert!(fields.contains_key("city"));
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn test_persona_record_serializes_assigned_fields() {
        let id = Uuid::new_v4();
        let at = DateTime::parse_from_rfc3339("2025-03-04T05:06:07Z")
            .unwrap()
            .with_timezone(&Utc);
        let record = PersonaRecord::new(persona(30), id, at);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], id.to_string());
        assert_eq!(value["registered_at"], "2025-03-04T05:06:07.000000Z");
        assert_eq!(value["city"], "Medellin");
    }
}
