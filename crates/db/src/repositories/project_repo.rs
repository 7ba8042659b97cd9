//! Repository for the `projects` table and its relations.
//!
//! Technologies, features and images are written as whole sets in the same
//! transaction as the project row, and the owning category's `count` moves
//! with every insert, re-categorization and delete.

use async_trait::async_trait;
use folio_core::pagination::{non_blank, search_pattern, ListQuery, Page};
use folio_core::slug::slugify;
use folio_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::project::{CreateProject, Project, ProjectFilter, ProjectSort, UpdateProject};
use crate::repositories::category_repo::CategoryRepo;
use crate::repositories::relations::{
    replace_names, replace_project_images, PROJECT_FEATURES, PROJECT_TECHNOLOGIES,
};
use crate::repositories::resource::Resource;

/// Column list for project reads, relations flattened to arrays.
const COLUMNS: &str = "\
    p.id, p.title, p.slug, p.summary, p.content, p.category_id, \
    c.name AS category_name, p.status, p.featured, p.cover_image, p.live_url, \
    p.repo_url, p.sort_order, \
    ARRAY(SELECT t.name FROM project_technologies pt \
          JOIN technologies t ON t.id = pt.technology_id \
          WHERE pt.project_id = p.id ORDER BY LOWER(t.name)) AS technologies, \
    ARRAY(SELECT f.name FROM project_features pf \
          JOIN features f ON f.id = pf.feature_id \
          WHERE pf.project_id = p.id ORDER BY LOWER(f.name)) AS features, \
    ARRAY(SELECT i.url FROM project_images i \
          WHERE i.project_id = p.id ORDER BY i.sort_order, i.id) AS images, \
    p.created_at, p.updated_at";

const FROM: &str = "projects p LEFT JOIN categories c ON c.id = p.category_id";

/// `$1` category, `$2` status, `$3` featured, `$4` technology, `$5` search.
const FILTER: &str = "\
    ($1::TEXT IS NULL OR p.category_id = $1) \
    AND ($2::TEXT IS NULL OR p.status = $2) \
    AND ($3::BOOLEAN IS NULL OR p.featured = $3) \
    AND ($4::TEXT IS NULL OR EXISTS ( \
        SELECT 1 FROM project_technologies pt \
        JOIN technologies t ON t.id = pt.technology_id \
        WHERE pt.project_id = p.id AND LOWER(t.name) = LOWER($4))) \
    AND ($5::TEXT IS NULL OR p.title ILIKE $5 OR p.summary ILIKE $5)";

pub struct ProjectRepo;

impl ProjectRepo {
    /// Find a project by its public slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE p.slug = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Read one project through any executor (pool or open transaction).
    async fn fetch<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE p.id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}

#[async_trait]
impl Resource for ProjectRepo {
    const ENTITY: &'static str = "Project";

    type Id = DbId;
    type Record = Project;
    type Create = CreateProject;
    type Update = UpdateProject;
    type Filter = ProjectFilter;
    type Sort = ProjectSort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<ProjectFilter, ProjectSort>,
    ) -> Result<Page<Project>, sqlx::Error> {
        let filter = &query.filter;
        let category = non_blank(filter.category.as_deref());
        let status = non_blank(filter.status.as_deref());
        let technology = non_blank(filter.technology.as_deref());
        let pattern = search_pattern(filter.q.as_deref());

        let count_sql = format!("SELECT COUNT(*) FROM projects p WHERE {FILTER}");
        let page_sql = format!(
            "SELECT {COLUMNS} FROM {FROM} WHERE {FILTER} \
             ORDER BY {}, p.id LIMIT $6 OFFSET $7",
            query.sort.order_by()
        );

        let count = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(category)
            .bind(status)
            .bind(filter.featured)
            .bind(technology)
            .bind(&pattern)
            .fetch_one(pool);
        let rows = sqlx::query_as::<_, Project>(&page_sql)
            .bind(category)
            .bind(status)
            .bind(filter.featured)
            .bind(technology)
            .bind(&pattern)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &DbId) -> Result<Option<Project>, sqlx::Error> {
        Self::fetch(pool, *id).await
    }

    /// The slug is derived from `title` when omitted.
    async fn create(
        pool: &PgPool,
        input: &CreateProject,
        _actor: Option<DbId>,
    ) -> Result<Project, sqlx::Error> {
        let slug = input
            .slug
            .clone()
            .or_else(|| input.title.as_deref().map(slugify));

        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO projects \
                (title, slug, summary, content, category_id, status, featured, \
                 cover_image, live_url, repo_url, sort_order) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'draft'), COALESCE($7, false), \
                     $8, $9, $10, COALESCE($11, 0)) \
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&slug)
        .bind(&input.summary)
        .bind(&input.content)
        .bind(&input.category_id)
        .bind(&input.status)
        .bind(input.featured)
        .bind(&input.cover_image)
        .bind(&input.live_url)
        .bind(&input.repo_url)
        .bind(input.sort_order)
        .fetch_one(&mut *tx)
        .await?;

        replace_names(&mut tx, &PROJECT_TECHNOLOGIES, id, &input.technologies).await?;
        replace_names(&mut tx, &PROJECT_FEATURES, id, &input.features).await?;
        replace_project_images(&mut tx, id, &input.images).await?;

        if let Some(category_id) = &input.category_id {
            CategoryRepo::adjust_count(&mut tx, category_id, 1).await?;
        }

        let project = Self::fetch(&mut *tx, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;
        Ok(project)
    }

    async fn update(
        pool: &PgPool,
        id: &DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let previous: Option<Option<String>> =
            sqlx::query_scalar("SELECT category_id FROM projects WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(previous_category) = previous else {
            return Ok(None);
        };

        sqlx::query(
            "UPDATE projects SET \
                title = COALESCE($2, title), \
                slug = COALESCE($3, slug), \
                summary = COALESCE($4, summary), \
                content = COALESCE($5, content), \
                category_id = COALESCE($6, category_id), \
                status = COALESCE($7, status), \
                featured = COALESCE($8, featured), \
                cover_image = COALESCE($9, cover_image), \
                live_url = COALESCE($10, live_url), \
                repo_url = COALESCE($11, repo_url), \
                sort_order = COALESCE($12, sort_order), \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.summary)
        .bind(&input.content)
        .bind(&input.category_id)
        .bind(&input.status)
        .bind(input.featured)
        .bind(&input.cover_image)
        .bind(&input.live_url)
        .bind(&input.repo_url)
        .bind(input.sort_order)
        .execute(&mut *tx)
        .await?;

        if let Some(technologies) = &input.technologies {
            replace_names(&mut tx, &PROJECT_TECHNOLOGIES, *id, technologies).await?;
        }
        if let Some(features) = &input.features {
            replace_names(&mut tx, &PROJECT_FEATURES, *id, features).await?;
        }
        if let Some(images) = &input.images {
            replace_project_images(&mut tx, *id, images).await?;
        }

        if let Some(new_category) = &input.category_id {
            if previous_category.as_deref() != Some(new_category.as_str()) {
                if let Some(old_category) = &previous_category {
                    CategoryRepo::adjust_count(&mut tx, old_category, -1).await?;
                }
                CategoryRepo::adjust_count(&mut tx, new_category, 1).await?;
            }
        }

        let project = Self::fetch(&mut *tx, *id).await?;
        tx.commit().await?;
        Ok(project)
    }

    async fn delete(pool: &PgPool, id: &DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted: Option<Option<String>> =
            sqlx::query_scalar("DELETE FROM projects WHERE id = $1 RETURNING category_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(category) = deleted else {
            return Ok(false);
        };
        if let Some(category_id) = &category {
            CategoryRepo::adjust_count(&mut tx, category_id, -1).await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}
