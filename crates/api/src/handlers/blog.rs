use axum::extract::State;
use folio_core::error::CoreError;
use folio_db::models::blog::BlogPost;
use folio_db::repositories::BlogPostRepo;

use crate::error::AppResult;
use crate::extract::ValidPath;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/blogs/posts/slug/{slug}
pub async fn get_post_by_slug(
    State(state): State<AppState>,
    ValidPath(slug): ValidPath<String>,
) -> AppResult<ApiResponse<BlogPost>> {
    let post = BlogPostRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("BlogPost", &slug))?;
    Ok(ApiResponse::ok(post))
}
