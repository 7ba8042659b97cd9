//! Handlers for hosted media assets.

use axum::extract::State;
use folio_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::extract::ValidPath;
use crate::media::{MediaDeletion, MediaError};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// DELETE /api/media/{*public_id}
///
/// `public_id` may contain slashes (folder paths).
pub async fn delete_media(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidPath(public_id): ValidPath<String>,
) -> AppResult<ApiResponse<()>> {
    let store = state
        .media
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("Media storage is not configured".into()))?;

    match store.delete(&public_id).await? {
        MediaDeletion::Deleted => {
            tracing::info!(public_id = %public_id, admin_id = admin.id, "Media deleted");
            Ok(ApiResponse::deleted("Media deleted successfully"))
        }
        MediaDeletion::NotFound => Err(CoreError::not_found("Media", &public_id).into()),
        MediaDeletion::Other(result) => Err(MediaError::Rejected(result).into()),
    }
}
