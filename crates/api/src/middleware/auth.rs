//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use folio_core::error::CoreError;
use folio_core::types::DbId;
use folio_db::repositories::UserRepo;

use crate::auth::jwt::{token_rejection, validate_token};
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated principal behind a request.
///
/// Extraction verifies the Bearer token, re-reads the user row (so deleted
/// or deactivated accounts lose access immediately and role changes apply
/// without re-login) and counts the request against the rate limiter.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: DbId,
    pub email: String,
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by an outer extractor for this request.
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| CoreError::Unauthorized("Authentication required".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                )
            })?;

        let claims =
            validate_token(token, &state.config.jwt).map_err(|e| token_rejection(&e))?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| CoreError::Unauthorized("User no longer exists".into()))?;

        if !user.is_active {
            return Err(CoreError::Unauthorized("Account is deactivated".into()).into());
        }

        state.rate_limiter.check(&format!("user:{}", user.id)).await?;

        let auth = AuthUser {
            id: user.id,
            email: user.email,
            role: user.role,
        };
        parts.extensions.insert(auth.clone());
        Ok(auth)
    }
}
