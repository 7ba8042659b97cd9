//! Project lookups beyond generic CRUD.

use axum::extract::State;
use folio_core::error::CoreError;
use folio_db::models::project::Project;
use folio_db::repositories::ProjectRepo;

use crate::error::AppResult;
use crate::extract::ValidPath;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/projects/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    ValidPath(slug): ValidPath<String>,
) -> AppResult<ApiResponse<Project>> {
    let project = ProjectRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Project", &slug))?;
    Ok(ApiResponse::ok(project))
}
