//! Generic list/get/create/update/delete handlers over any [`Resource`].
//!
//! A [`CrudResource`] pairs a repository with its display label and the
//! role policies guarding reads, creates and edits. Routes are mounted with
//! [`crate::routes::crud::crud_router`].

use axum::extract::State;
use folio_core::error::CoreError;
use folio_core::pagination::{ListQuery, PageQuery};
use folio_db::repositories::{
    AboutSectionRepo, BlogCategoryRepo, BlogPostRepo, BlogTagRepo, CategoryRepo, ClientRepo,
    ContactRepo, HeroSectionRepo, MilestoneRepo, ProjectRepo, Resource, ServiceRepo,
    StatisticRepo, TeamMemberRepo, TechnologyRepo, TestimonialRepo,
};

use crate::error::AppResult;
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::middleware::rbac::{Access, AdminOnly, Policy, Public, Staff};
use crate::response::ApiResponse;
use crate::state::AppState;

/// A [`Resource`] exposed over HTTP.
pub trait CrudResource: Resource {
    /// Human-readable name used in response messages, e.g. `"Blog post"`.
    const LABEL: &'static str;

    /// Who may list and fetch.
    type Readers: Policy;
    /// Who may create.
    type Creators: Policy;
    /// Who may update and delete.
    type Editors: Policy;
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/{resource}?page=&limit=&sort=&<filters>
pub async fn list<R: CrudResource>(
    State(state): State<AppState>,
    _access: Access<R::Readers>,
    ValidQuery(page): ValidQuery<PageQuery>,
    ValidQuery(filter): ValidQuery<R::Filter>,
) -> AppResult<ApiResponse<Vec<R::Record>>> {
    let query = ListQuery::<R::Filter, R::Sort>::resolve(&page, filter);
    let page = R::list(&state.pool, &query).await?;
    Ok(ApiResponse::paginated(page))
}

/// GET /api/{resource}/{id}
pub async fn get<R: CrudResource>(
    State(state): State<AppState>,
    _access: Access<R::Readers>,
    ValidPath(id): ValidPath<R::Id>,
) -> AppResult<ApiResponse<R::Record>> {
    let record = R::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found(R::ENTITY, &id))?;
    Ok(ApiResponse::ok(record))
}

/// POST /api/{resource}
pub async fn create<R: CrudResource>(
    State(state): State<AppState>,
    access: Access<R::Creators>,
    ValidJson(input): ValidJson<R::Create>,
) -> AppResult<ApiResponse<R::Record>> {
    let actor = access.user_id();
    let record = R::create(&state.pool, &input, actor).await?;

    tracing::info!(entity = R::ENTITY, user_id = ?actor, "Record created");

    Ok(ApiResponse::created(
        record,
        format!("{} created successfully", R::LABEL),
    ))
}

/// PUT /api/{resource}/{id}
pub async fn update<R: CrudResource>(
    State(state): State<AppState>,
    access: Access<R::Editors>,
    ValidPath(id): ValidPath<R::Id>,
    ValidJson(input): ValidJson<R::Update>,
) -> AppResult<ApiResponse<R::Record>> {
    let record = R::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found(R::ENTITY, &id))?;

    tracing::info!(entity = R::ENTITY, id = %id, user_id = ?access.user_id(), "Record updated");

    Ok(ApiResponse::updated(
        record,
        format!("{} updated successfully", R::LABEL),
    ))
}

/// DELETE /api/{resource}/{id}
///
/// Refused with 400 `IN_USE` while other rows still reference the record.
pub async fn delete<R: CrudResource>(
    State(state): State<AppState>,
    access: Access<R::Editors>,
    ValidPath(id): ValidPath<R::Id>,
) -> AppResult<ApiResponse<()>> {
    if let Some(dependents) = R::dependents(&state.pool, &id).await? {
        return Err(CoreError::InUse {
            message: dependents.message.to_string(),
            count_key: dependents.count_key,
            count: dependents.count,
        }
        .into());
    }

    if !R::delete(&state.pool, &id).await? {
        return Err(CoreError::not_found(R::ENTITY, &id).into());
    }

    tracing::info!(entity = R::ENTITY, id = %id, user_id = ?access.user_id(), "Record deleted");

    Ok(ApiResponse::deleted(format!(
        "{} deleted successfully",
        R::LABEL
    )))
}

// ---------------------------------------------------------------------------
// Resource policies
// ---------------------------------------------------------------------------

impl CrudResource for ProjectRepo {
    const LABEL: &'static str = "Project";
    type Readers = Public;
    type Creators = AdminOnly;
    type Editors = AdminOnly;
}

impl CrudResource for CategoryRepo {
    const LABEL: &'static str = "Category";
    type Readers = Public;
    type Creators = AdminOnly;
    type Editors = AdminOnly;
}

impl CrudResource for TechnologyRepo {
    const LABEL: &'static str = "Technology";
    type Readers = Public;
    type Creators = AdminOnly;
    type Editors = AdminOnly;
}

impl CrudResource for BlogPostRepo {
    const LABEL: &'static str = "Blog post";
    type Readers = Public;
    type Creators = Staff;
    type Editors = Staff;
}

impl CrudResource for BlogCategoryRepo {
    const LABEL: &'static str = "Blog category";
    type Readers = Public;
    type Creators = Staff;
    type Editors = Staff;
}

impl CrudResource for BlogTagRepo {
    const LABEL: &'static str = "Blog tag";
    type Readers = Public;
    type Creators = Staff;
    type Editors = Staff;
}

impl CrudResource for TeamMemberRepo {
    const LABEL: &'static str = "Team member";
    type Readers = Public;
    type Creators = AdminOnly;
    type Editors = AdminOnly;
}

impl CrudResource for TestimonialRepo {
    const LABEL: &'static str = "Testimonial";
    type Readers = Public;
    type Creators = AdminOnly;
    type Editors = AdminOnly;
}

impl CrudResource for ClientRepo {
    const LABEL: &'static str = "Client";
    type Readers = Public;
    type Creators = AdminOnly;
    type Editors = AdminOnly;
}

impl CrudResource for ServiceRepo {
    const LABEL: &'static str = "Service";
    type Readers = Public;
    type Creators = AdminOnly;
    type Editors = AdminOnly;
}

impl CrudResource for StatisticRepo {
    const LABEL: &'static str = "Statistic";
    type Readers = Public;
    type Creators = AdminOnly;
    type Editors = AdminOnly;
}

impl CrudResource for HeroSectionRepo {
    const LABEL: &'static str = "Hero section";
    type Readers = Public;
    type Creators = AdminOnly;
    type Editors = AdminOnly;
}

impl CrudResource for AboutSectionRepo {
    const LABEL: &'static str = "About section";
    type Readers = Public;
    type Creators = AdminOnly;
    type Editors = AdminOnly;
}

impl CrudResource for MilestoneRepo {
    const LABEL: &'static str = "Milestone";
    type Readers = Public;
    type Creators = AdminOnly;
    type Editors = AdminOnly;
}

/// Contact messages are submitted by anyone and managed by admins.
impl CrudResource for ContactRepo {
    const LABEL: &'static str = "Contact message";
    type Readers = AdminOnly;
    type Creators = Public;
    type Editors = AdminOnly;
}
