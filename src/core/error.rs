//! Typed error handling for the shelf service
//!
//! Every gateway operation returns [`ShelfResult`]. The variants follow the
//! taxonomy the HTTP layer exposes:
//!
//! - [`ShelfError::Unauthenticated`] → 401
//! - [`ShelfError::Forbidden`] → 403
//! - [`ShelfError::NotFound`] / [`ShelfError::NotFoundParent`] → 404
//! - [`ShelfError::Validation`] → 400
//! - [`ShelfError::Storage`] / [`ShelfError::Internal`] → 500
//!
//! # Example
//!
//! ```rust,ignore
//! let book = store
//!     .get_book(&id)
//!     .await?
//!     .ok_or(ShelfError::not_found(Book::resource_name_singular(), id))?;
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

/// The main error type of the service
#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    /// No valid principal is attached to the request
    #[error("Authentication credentials were not provided")]
    Unauthenticated,

    /// The principal is known but the policy denies the operation
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Identifier does not resolve within the caller's visible scope
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: &'static str, id: Uuid },

    /// Parent resource addressed in the path does not exist
    #[error("Parent {entity_type} with id '{id}' not found")]
    NotFoundParent { entity_type: &'static str, id: Uuid },

    /// Payload or constraint validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage backend failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShelfError {
    pub fn not_found(entity_type: &'static str, id: Uuid) -> Self {
        ShelfError::NotFound { entity_type, id }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ShelfError::Forbidden {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShelfError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ShelfError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ShelfError::NotFound { .. } | ShelfError::NotFoundParent { .. } => {
                StatusCode::NOT_FOUND
            }
            ShelfError::Validation(_) => StatusCode::BAD_REQUEST,
            ShelfError::Storage(_) | ShelfError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShelfError::Unauthenticated => "NOT_AUTHENTICATED",
            ShelfError::Forbidden { .. } => "PERMISSION_DENIED",
            ShelfError::NotFound { .. } => "NOT_FOUND",
            ShelfError::NotFoundParent { .. } => "PARENT_NOT_FOUND",
            ShelfError::Validation(e) => e.error_code(),
            ShelfError::Storage(_) => "STORAGE_ERROR",
            ShelfError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShelfError::NotFound { entity_type, id }
            | ShelfError::NotFoundParent { entity_type, id } => Some(serde_json::json!({
                "entity_type": entity_type,
                "id": id.to_string()
            })),
            ShelfError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            ShelfError::Validation(ValidationError::UniqueViolation { constraint, .. }) => {
                Some(serde_json::json!({ "constraint": constraint }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ShelfError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors raised by payload validation and store constraints
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// A uniqueness constraint rejected the write
    #[error("{message}")]
    UniqueViolation {
        constraint: &'static str,
        message: String,
    },

    /// A reference field points at a record that does not exist
    #[error("Invalid reference in '{field}': {entity_type} '{id}' does not exist")]
    ForeignKeyViolation {
        field: &'static str,
        entity_type: &'static str,
        id: Uuid,
    },

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Invalid identifier: '{value}'")]
    InvalidId { value: String },

    #[error("Missing file attachment")]
    MissingFile,
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::FieldError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldError { .. } | ValidationError::FieldErrors(_) => {
                "VALIDATION_ERROR"
            }
            ValidationError::UniqueViolation { .. } => "UNIQUE_VIOLATION",
            ValidationError::ForeignKeyViolation { .. } => "INVALID_REFERENCE",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            ValidationError::InvalidId { .. } => "INVALID_ID",
            ValidationError::MissingFile => "MISSING_FILE",
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to acquire {kind} lock on {backend} store")]
    LockPoisoned {
        backend: &'static str,
        kind: &'static str,
    },

    #[error("Blob storage error: {message}")]
    Blob { message: String },
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for ShelfError {
    fn from(err: serde_json::Error) -> Self {
        ShelfError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<validator::ValidationErrors> for ShelfError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ShelfError::Validation(errors.into())
    }
}

impl From<anyhow::Error> for ShelfError {
    fn from(err: anyhow::Error) -> Self {
        ShelfError::Internal(err.to_string())
    }
}

/// A specialized Result type for shelf operations
pub type ShelfResult<T> = Result<T, ShelfError>;
