//! Request extractors that reject with the API's error envelope instead of
//! axum's plain-text defaults.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use folio_core::error::CoreError;
use folio_core::validation::{validate_payload, Payload};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

/// Message returned when a partial update carries no usable field.
pub const EMPTY_UPDATE_MESSAGE: &str = "At least one field must be provided for update";

// ---------------------------------------------------------------------------
// ValidJson
// ---------------------------------------------------------------------------

/// A JSON body that has been trimmed, deserialized and validated.
///
/// String values are trimmed before deserialization, except under keys
/// containing `password`. Partial payloads must carry at least one non-null
/// field.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: Payload + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        let Some(fields) = body.as_object() else {
            return Err(AppError::BadRequest(
                "Request body must be a JSON object".into(),
            ));
        };
        if T::PARTIAL && fields.values().all(Value::is_null) {
            return Err(CoreError::Validation(EMPTY_UPDATE_MESSAGE.into()).into());
        }

        trim_strings(&mut body);

        let input: T = serde_json::from_value(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?;
        validate_payload(&input)?;
        Ok(ValidJson(input))
    }
}

/// Trim every string in `value`, leaving password fields untouched.
fn trim_strings(value: &mut Value) {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
        Value::Array(items) => items.iter_mut().for_each(trim_strings),
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if !key.to_ascii_lowercase().contains("password") {
                    trim_strings(v);
                }
            }
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// ValidQuery / ValidPath
// ---------------------------------------------------------------------------

/// Query-string parameters; malformed values answer 400.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(ValidQuery(value))
    }
}

/// Path parameters; an unparseable id answers 400.
#[derive(Debug)]
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::BadRequest(format!("Invalid path parameter: {}", rejection.body_text()))
            })?;
        Ok(ValidPath(value))
    }
}
