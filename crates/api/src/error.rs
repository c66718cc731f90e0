//! API error types with HTTP response mapping.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ledger::{DomainError, FieldIssue, ValidationErrors};
use reporting::ReportingError;
use serde::Serialize;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client (unreadable body, path or query).
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
    /// Read-side query failure; reported as an internal error.
    Reporting(ReportingError),
}

/// JSON error body: a message plus per-field issues for validation failures.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldIssue>>,
}

impl ErrorBody {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::message(msg)),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Reporting(err) => {
                tracing::error!(error = %err, "reporting query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::message("Internal server error"),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, ErrorBody) {
    match err {
        DomainError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            ErrorBody {
                message: "Invalid input".to_string(),
                errors: Some(errors.issues().to_vec()),
            },
        ),
        DomainError::NotFound { entity, .. } => (
            StatusCode::NOT_FOUND,
            ErrorBody::message(format!("{entity} not found")),
        ),
        DomainError::DuplicateSku(_) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::message("SKU already exists"),
        ),
        DomainError::InsufficientStock { .. } => (
            StatusCode::BAD_REQUEST,
            ErrorBody::message("Insufficient stock"),
        ),
        DomainError::StockLimitExceeded { .. } => (
            StatusCode::BAD_REQUEST,
            ErrorBody::message("Stock limit exceeded"),
        ),
        DomainError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            ErrorBody::message("Invalid credentials"),
        ),
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<ReportingError> for ApiError {
    fn from(err: ReportingError) -> Self {
        ApiError::Reporting(err)
    }
}

const JSON_DATA_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Splits a JSON data error into the offending field path and serde's
/// message. Errors not tied to a field are reported against `body`.
fn json_data_issue(text: &str) -> (String, String) {
    let detail = text.strip_prefix(JSON_DATA_PREFIX).unwrap_or(text);
    let detail = detail
        .rsplit_once(" at line ")
        .map_or(detail, |(head, _)| head);
    match detail.split_once(": ") {
        Some((path, message)) if !path.is_empty() && !path.contains(' ') => {
            (path.to_string(), message.to_string())
        }
        _ => ("body".to_string(), detail.to_string()),
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let (field, message) = json_data_issue(&err.body_text());
                ApiError::Domain(DomainError::Validation(ValidationErrors::single(
                    field, message,
                )))
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
