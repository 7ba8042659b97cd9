//! Success envelope shared by every handler.
//!
//! Every success body is `{success: true, data?, pagination?, message?}`.
//! Reads answer 200, creates 201, updates and deletes 200.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use folio_core::pagination::{Page, Pagination};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    fn build(status: StatusCode, data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
            message,
            status,
        }
    }

    /// 200 with `data`.
    pub fn ok(data: T) -> Self {
        Self::build(StatusCode::OK, Some(data), None)
    }

    /// 201 with the created record.
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::build(StatusCode::CREATED, Some(data), Some(message.into()))
    }

    /// 200 with the updated record.
    pub fn updated(data: T, message: impl Into<String>) -> Self {
        Self::build(StatusCode::OK, Some(data), Some(message.into()))
    }
}

impl ApiResponse<()> {
    /// 200 with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::build(StatusCode::OK, None, Some(message.into()))
    }

    pub fn deleted(message: impl Into<String>) -> Self {
        Self::message(message)
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// 200 with one page of items and its pagination block.
    pub fn paginated(page: Page<T>) -> Self {
        Self {
            pagination: Some(page.pagination),
            ..Self::build(StatusCode::OK, Some(page.items), None)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
