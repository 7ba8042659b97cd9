//! Repository for the `hero_sections` table.

use async_trait::async_trait;
use folio_core::pagination::{ListQuery, Page};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::hero::{
    CreateHeroSection, HeroSection, HeroSectionFilter, HeroSectionSort, UpdateHeroSection,
};
use crate::repositories::resource::Resource;

const COLUMNS: &str = "h.id, h.title, h.subtitle, h.cta_text, h.cta_url, h.background_image, \
    h.is_active, h.created_at, h.updated_at";

pub struct HeroSectionRepo;

impl HeroSectionRepo {
    /// The most recently updated active section, if any.
    pub async fn find_active(pool: &PgPool) -> Result<Option<HeroSection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM hero_sections h \
             WHERE h.is_active \
             ORDER BY h.updated_at DESC, h.id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, HeroSection>(&query)
            .fetch_optional(pool)
            .await
    }
}

#[async_trait]
impl Resource for HeroSectionRepo {
    const ENTITY: &'static str = "HeroSection";

    type Id = DbId;
    type Record = HeroSection;
    type Create = CreateHeroSection;
    type Update = UpdateHeroSection;
    type Filter = HeroSectionFilter;
    type Sort = HeroSectionSort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<HeroSectionFilter, HeroSectionSort>,
    ) -> Result<Page<HeroSection>, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM hero_sections h \
             WHERE ($1::BOOLEAN IS NULL OR h.is_active = $1)",
        )
        .bind(query.filter.is_active)
        .fetch_one(pool);

        let page_sql = format!(
            "SELECT {COLUMNS} FROM hero_sections h \
             WHERE ($1::BOOLEAN IS NULL OR h.is_active = $1) \
             ORDER BY {}, h.id LIMIT $2 OFFSET $3",
            query.sort.order_by()
        );
        let rows = sqlx::query_as::<_, HeroSection>(&page_sql)
            .bind(query.filter.is_active)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &DbId) -> Result<Option<HeroSection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hero_sections h WHERE h.id = $1");
        sqlx::query_as::<_, HeroSection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn create(
        pool: &PgPool,
        input: &CreateHeroSection,
        _actor: Option<DbId>,
    ) -> Result<HeroSection, sqlx::Error> {
        let query = format!(
            "INSERT INTO hero_sections AS h \
                (title, subtitle, cta_text, cta_url, background_image, is_active) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, false)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HeroSection>(&query)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.cta_text)
            .bind(&input.cta_url)
            .bind(&input.background_image)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    async fn update(
        pool: &PgPool,
        id: &DbId,
        input: &UpdateHeroSection,
    ) -> Result<Option<HeroSection>, sqlx::Error> {
        let query = format!(
            "UPDATE hero_sections AS h SET \
                title = COALESCE($2, h.title), \
                subtitle = COALESCE($3, h.subtitle), \
                cta_text = COALESCE($4, h.cta_text), \
                cta_url = COALESCE($5, h.cta_url), \
                background_image = COALESCE($6, h.background_image), \
                is_active = COALESCE($7, h.is_active), \
                updated_at = NOW() \
             WHERE h.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HeroSection>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.subtitle)
            .bind(&input.cta_text)
            .bind(&input.cta_url)
            .bind(&input.background_image)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    async fn delete(pool: &PgPool, id: &DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hero_sections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
