//! Handlers for the `/users` resource.
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::State;
use folio_core::error::CoreError;
use folio_core::pagination::{ListQuery, PageQuery};
use folio_core::types::DbId;
use folio_db::models::user::{CreateUser, UpdateUser, User, UserFilter, UserSort};
use folio_db::repositories::UserRepo;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

fn hash(password: &str) -> AppResult<String> {
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidQuery(page): ValidQuery<PageQuery>,
    ValidQuery(filter): ValidQuery<UserFilter>,
) -> AppResult<ApiResponse<Vec<User>>> {
    let query = ListQuery::<UserFilter, UserSort>::resolve(&page, filter);
    let page = UserRepo::list(&state.pool, &query).await?;
    Ok(ApiResponse::paginated(page))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<ApiResponse<User>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", id))?;
    Ok(ApiResponse::ok(user))
}

/// POST /api/users
///
/// Create a user; the password is stored as an argon2id hash.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidJson(input): ValidJson<CreateUser>,
) -> AppResult<ApiResponse<User>> {
    let hashed = hash(input.password.as_deref().unwrap_or_default())?;
    let user = UserRepo::create(&state.pool, &input, &hashed).await?;

    tracing::info!(user_id = user.id, role = %user.role, admin_id = admin.id, "User created");

    Ok(ApiResponse::created(user, "User created successfully"))
}

/// PUT /api/users/{id}
///
/// Partial update; a present `password` resets it.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidPath(id): ValidPath<DbId>,
    ValidJson(input): ValidJson<UpdateUser>,
) -> AppResult<ApiResponse<User>> {
    let hashed = input.password.as_deref().map(hash).transpose()?;
    let user = UserRepo::update(&state.pool, id, &input, hashed.as_deref())
        .await?
        .ok_or_else(|| CoreError::not_found("User", id))?;

    tracing::info!(
        user_id = id,
        admin_id = admin.id,
        password_reset = hashed.is_some(),
        "User updated"
    );

    Ok(ApiResponse::updated(user, "User updated successfully"))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<ApiResponse<()>> {
    if id == admin.id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".into(),
        ));
    }

    if !UserRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found("User", id).into());
    }

    tracing::info!(user_id = id, admin_id = admin.id, "User deleted");

    Ok(ApiResponse::deleted("User deleted successfully"))
}
