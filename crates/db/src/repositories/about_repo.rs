//! Repositories for the `about_sections` and `about_milestones` tables.

use async_trait::async_trait;
use folio_core::pagination::{search_pattern, ListQuery, Page};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::about::{
    AboutSection, AboutSectionFilter, AboutSectionSort, CreateAboutSection, CreateMilestone,
    Milestone, MilestoneFilter, MilestoneSort, UpdateAboutSection, UpdateMilestone,
};
use crate::repositories::resource::Resource;

const SECTION_COLUMNS: &str =
    "a.id, a.title, a.content, a.image_url, a.sort_order, a.created_at, a.updated_at";

const MILESTONE_COLUMNS: &str = "m.id, m.year, m.title, m.description, m.created_at, m.updated_at";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

pub struct AboutSectionRepo;

#[async_trait]
impl Resource for AboutSectionRepo {
    const ENTITY: &'static str = "AboutSection";

    type Id = DbId;
    type Record = AboutSection;
    type Create = CreateAboutSection;
    type Update = UpdateAboutSection;
    type Filter = AboutSectionFilter;
    type Sort = AboutSectionSort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<AboutSectionFilter, AboutSectionSort>,
    ) -> Result<Page<AboutSection>, sqlx::Error> {
        let pattern = search_pattern(query.filter.q.as_deref());

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM about_sections a \
             WHERE ($1::TEXT IS NULL OR a.title ILIKE $1 OR a.content ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(pool);

        let page_sql = format!(
            "SELECT {SECTION_COLUMNS} FROM about_sections a \
             WHERE ($1::TEXT IS NULL OR a.title ILIKE $1 OR a.content ILIKE $1) \
             ORDER BY {}, a.id LIMIT $2 OFFSET $3",
            query.sort.order_by()
        );
        let rows = sqlx::query_as::<_, AboutSection>(&page_sql)
            .bind(&pattern)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &DbId) -> Result<Option<AboutSection>, sqlx::Error> {
        let query = format!("SELECT {SECTION_COLUMNS} FROM about_sections a WHERE a.id = $1");
        sqlx::query_as::<_, AboutSection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn create(
        pool: &PgPool,
        input: &CreateAboutSection,
        _actor: Option<DbId>,
    ) -> Result<AboutSection, sqlx::Error> {
        let query = format!(
            "INSERT INTO about_sections AS a (title, content, image_url, sort_order) \
             VALUES ($1, $2, $3, COALESCE($4, 0)) \
             RETURNING {SECTION_COLUMNS}"
        );
        sqlx::query_as::<_, AboutSection>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.image_url)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    async fn update(
        pool: &PgPool,
        id: &DbId,
        input: &UpdateAboutSection,
    ) -> Result<Option<AboutSection>, sqlx::Error> {
        let query = format!(
            "UPDATE about_sections AS a SET \
                title = COALESCE($2, a.title), \
                content = COALESCE($3, a.content), \
                image_url = COALESCE($4, a.image_url), \
                sort_order = COALESCE($5, a.sort_order), \
                updated_at = NOW() \
             WHERE a.id = $1 \
             RETURNING {SECTION_COLUMNS}"
        );
        sqlx::query_as::<_, AboutSection>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.image_url)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    async fn delete(pool: &PgPool, id: &DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM about_sections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

pub struct MilestoneRepo;

#[async_trait]
impl Resource for MilestoneRepo {
    const ENTITY: &'static str = "Milestone";

    type Id = DbId;
    type Record = Milestone;
    type Create = CreateMilestone;
    type Update = UpdateMilestone;
    type Filter = MilestoneFilter;
    type Sort = MilestoneSort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<MilestoneFilter, MilestoneSort>,
    ) -> Result<Page<Milestone>, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM about_milestones m \
             WHERE ($1::INTEGER IS NULL OR m.year = $1)",
        )
        .bind(query.filter.year)
        .fetch_one(pool);

        let page_sql = format!(
            "SELECT {MILESTONE_COLUMNS} FROM about_milestones m \
             WHERE ($1::INTEGER IS NULL OR m.year = $1) \
             ORDER BY {}, m.id LIMIT $2 OFFSET $3",
            query.sort.order_by()
        );
        let rows = sqlx::query_as::<_, Milestone>(&page_sql)
            .bind(query.filter.year)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &DbId) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!("SELECT {MILESTONE_COLUMNS} FROM about_milestones m WHERE m.id = $1");
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn create(
        pool: &PgPool,
        input: &CreateMilestone,
        _actor: Option<DbId>,
    ) -> Result<Milestone, sqlx::Error> {
        let query = format!(
            "INSERT INTO about_milestones AS m (year, title, description) \
             VALUES ($1, $2, $3) \
             RETURNING {MILESTONE_COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(input.year)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    async fn update(
        pool: &PgPool,
        id: &DbId,
        input: &UpdateMilestone,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE about_milestones AS m SET \
                year = COALESCE($2, m.year), \
                title = COALESCE($3, m.title), \
                description = COALESCE($4, m.description), \
                updated_at = NOW() \
             WHERE m.id = $1 \
             RETURNING {MILESTONE_COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(input.year)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    async fn delete(pool: &PgPool, id: &DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM about_milestones WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
