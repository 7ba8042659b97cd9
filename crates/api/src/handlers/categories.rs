//! Category maintenance.

use axum::extract::State;
use folio_db::repositories::CategoryRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecountResult {
    /// Categories whose stored count was wrong and has been corrected.
    pub updated: u64,
}

/// POST /api/categories/recount
///
/// Recompute every category's project count from the projects table.
pub async fn recount(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<ApiResponse<RecountResult>> {
    let updated = CategoryRepo::recount(&state.pool).await?;

    tracing::info!(updated, admin_id = admin.id, "Category counts recalculated");

    Ok(ApiResponse::updated(
        RecountResult { updated },
        "Category counts recalculated",
    ))
}
