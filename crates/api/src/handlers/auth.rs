//! Handlers for the `/auth` resource (login, current user, password change).

use axum::extract::State;
use folio_core::error::CoreError;
use folio_db::models::user::{ChangePassword, LoginRequest, User};
use folio_db::repositories::UserRepo;
use serde::Serialize;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}

/// POST /api/auth/login
///
/// Exchange email + password for a signed access token.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let email = input.email.unwrap_or_default();
    let password = input.password.unwrap_or_default();

    let user = UserRepo::find_by_email_with_hash(&state.pool, &email)
        .await?
        .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    let password_valid = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
    }

    if !user.is_active {
        return Err(CoreError::Forbidden("Account is deactivated".into()).into());
    }

    let jwt = &state.config.jwt;
    let token = generate_access_token(user.id, &user.email, &user.role, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(ApiResponse::ok(LoginResponse {
        token,
        expires_in: jwt.expires_in_secs(),
        user: user.into_user(),
    }))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<ApiResponse<User>> {
    let user = UserRepo::find_by_id(&state.pool, auth.id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.id))?;
    Ok(ApiResponse::ok(user))
}

/// PUT /api/auth/password
///
/// Change the caller's own password after re-checking the current one.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(input): ValidJson<ChangePassword>,
) -> AppResult<ApiResponse<()>> {
    let current = input.current_password.unwrap_or_default();
    let new_password = input.new_password.unwrap_or_default();

    let user = UserRepo::find_by_id_with_hash(&state.pool, auth.id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.id))?;

    let matches = verify_password(&current, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !matches {
        return Err(CoreError::Validation("Current password is incorrect".into()).into());
    }

    let hashed = hash_password(&new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, auth.id, &hashed).await?;

    tracing::info!(user_id = auth.id, "Password changed");

    Ok(ApiResponse::message("Password updated successfully"))
}
