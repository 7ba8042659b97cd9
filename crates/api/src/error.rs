use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use folio_core::error::CoreError;
use serde_json::{json, Map, Value};

use crate::media::MediaError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the failure envelope
/// `{success: false, message, code, errors?}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `folio_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failed call to the media provider.
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// A classified failure, before serialization.
struct Failure {
    status: StatusCode,
    code: &'static str,
    message: String,
    /// Extra top-level body fields (`errors`, `retryAfter`, counts).
    extra: Map<String, Value>,
    retry_after_secs: Option<u64>,
}

impl Failure {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            extra: Map::new(),
            retry_after_secs: None,
        }
    }

    fn with(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            INTERNAL_MESSAGE,
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let failure = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Media(err) => {
                tracing::error!(error = %err, "Media provider error");
                Failure::new(
                    StatusCode::BAD_GATEWAY,
                    "MEDIA_ERROR",
                    "Media provider request failed",
                )
            }
            AppError::BadRequest(msg) => {
                Failure::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Failure::internal()
            }
        };

        let mut body = Map::new();
        body.insert("success".into(), Value::Bool(false));
        body.insert("message".into(), Value::String(failure.message));
        body.insert("code".into(), Value::String(failure.code.into()));
        body.extend(failure.extra);

        let mut response = (failure.status, axum::Json(Value::Object(body))).into_response();
        if let Some(secs) = failure.retry_after_secs {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

fn classify_core_error(err: &CoreError) -> Failure {
    match err {
        CoreError::NotFound { entity, id } => Failure::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            Failure::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        CoreError::InvalidFields(fields) => {
            Failure::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Validation failed")
                .with("errors", json!(fields))
        }
        CoreError::Conflict(msg) => Failure::new(StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::InUse {
            message,
            count_key,
            count,
        } => Failure::new(StatusCode::BAD_REQUEST, "IN_USE", message.clone())
            .with("error", json!(message))
            .with(count_key, json!(count)),
        CoreError::Unauthorized(msg) => {
            Failure::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
        }
        CoreError::Forbidden(msg) => Failure::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::RateLimited { retry_after_secs } => {
            let mut failure = Failure::new(
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "Too many requests, please try again later",
            )
            .with("retryAfter", json!(retry_after_secs));
            failure.retry_after_secs = Some(*retry_after_secs);
            failure
        }
    }
}

/// Classify a sqlx error by SQLSTATE code.
///
/// - `RowNotFound` maps to 404.
/// - `23505` unique violation maps to 409.
/// - `23503` foreign-key violation maps to 400 `INVALID_REFERENCE`.
/// - `23514` check, `23502` not-null and `22001` length violations map to
///   400 `VALIDATION_ERROR`.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> Failure {
    match err {
        sqlx::Error::RowNotFound => {
            Failure::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23505") => Failure::new(
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                ),
                Some("23503") => Failure::new(
                    StatusCode::BAD_REQUEST,
                    "INVALID_REFERENCE",
                    format!("Referenced record is missing or still in use: {constraint}"),
                ),
                Some("23514") => Failure::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Value violates check constraint: {constraint}"),
                ),
                Some("23502") => Failure::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "A required value is missing",
                ),
                Some("22001") => Failure::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Value is too long",
                ),
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    Failure::internal()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            Failure::internal()
        }
    }
}
