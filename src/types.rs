// Error types shared by the HTTP layer

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;
use validator::ValidationErrors;

use crate::storage::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The body never reached validation (bad JSON, wrong content type).
    #[error("Invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error("Error accessing storage: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// One entry of a validation error body, `{"loc": [...], "msg": ..., "type": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize)]
struct ValidationBody {
    detail: Vec<FieldIssue>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidBody { status, .. } => *status,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Flatten validator output into a stable, field-sorted list.
pub fn field_issues(errors: &ValidationErrors) -> Vec<FieldIssue> {
    let mut issues: Vec<FieldIssue> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| FieldIssue {
                loc: vec!["body".to_string(), field.to_string()],
                msg: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value for {}", field)),
                kind: err.code.to_string(),
            })
        })
        .collect();
    issues.sort_by(|a, b| a.loc.cmp(&b.loc));
    issues
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            AppError::Validation(errors) => {
                let body = ValidationBody {
                    detail: field_issues(&errors),
                };
                (status, Json(body)).into_response()
            }
            AppError::InvalidBody { message, .. } => {
                let body = ValidationBody {
                    detail: vec![FieldIssue {
                        loc: vec!["body".to_string()],
                        msg: message,
                        kind: "invalid_body".to_string(),
                    }],
                };
                (status, Json(body)).into_response()
            }
            other => {
                error!("Request failed: {}", other);
                (status, Json(ErrorBody { detail: other.to_string() })).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation(ValidationErrors::new()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Store(StoreError::Backend("boom".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::InvalidBody {
                status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
                message: "expected json".to_string(),
            }
            .status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn test_store_error_message() {
        let err = AppError::from(StoreError::Timeout {
            operation: "get",
            millis: 250,
        });
        assert_eq!(err.to_string(), "Error accessing storage: get timed out after 250 ms");
    }

    #[test]
    fn test_field_issues_are_sorted() {
        let mut errors = ValidationErrors::new();
        errors.add("phone", ValidationError::new("phone_format"));
        errors.add("age", ValidationError::new("range"));

        let issues = field_issues(&errors);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].loc, vec!["body", "age"]);
        assert_eq!(issues[1].loc, vec!["body", "phone"]);
        assert_eq!(issues[1].kind, "phone_format");
    }
}
