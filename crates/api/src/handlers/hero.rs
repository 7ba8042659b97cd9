use axum::extract::State;
use folio_core::error::CoreError;
use folio_db::models::hero::HeroSection;
use folio_db::repositories::HeroSectionRepo;

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/hero/active
///
/// The most recently updated active hero section.
pub async fn get_active(State(state): State<AppState>) -> AppResult<ApiResponse<HeroSection>> {
    let hero = HeroSectionRepo::find_active(&state.pool)
        .await?
        .ok_or_else(|| CoreError::not_found("HeroSection", "active"))?;
    Ok(ApiResponse::ok(hero))
}
