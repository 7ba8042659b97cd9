//! Repository for the `technologies` table.
//!
//! Technologies are also created implicitly when a project names one that
//! does not exist yet; see `relations::replace_names`.

use async_trait::async_trait;
use folio_core::pagination::{search_pattern, ListQuery, Page};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::technology::{
    CreateTechnology, Technology, TechnologyFilter, TechnologySort, UpdateTechnology,
};
use crate::repositories::resource::Resource;

/// Column list (aliased `t`) including the computed usage count.
const COLUMNS: &str = "t.id, t.name, t.icon_url, \
    (SELECT COUNT(*) FROM project_technologies pt WHERE pt.technology_id = t.id) AS project_count, \
    t.created_at, t.updated_at";

pub struct TechnologyRepo;

#[async_trait]
impl Resource for TechnologyRepo {
    const ENTITY: &'static str = "Technology";

    type Id = DbId;
    type Record = Technology;
    type Create = CreateTechnology;
    type Update = UpdateTechnology;
    type Filter = TechnologyFilter;
    type Sort = TechnologySort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<TechnologyFilter, TechnologySort>,
    ) -> Result<Page<Technology>, sqlx::Error> {
        let pattern = search_pattern(query.filter.q.as_deref());

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM technologies t WHERE ($1::TEXT IS NULL OR t.name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(pool);

        let page_sql = format!(
            "SELECT {COLUMNS} FROM technologies t \
             WHERE ($1::TEXT IS NULL OR t.name ILIKE $1) \
             ORDER BY {}, t.id LIMIT $2 OFFSET $3",
            query.sort.order_by()
        );
        let rows = sqlx::query_as::<_, Technology>(&page_sql)
            .bind(&pattern)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &DbId) -> Result<Option<Technology>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM technologies t WHERE t.id = $1");
        sqlx::query_as::<_, Technology>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn create(
        pool: &PgPool,
        input: &CreateTechnology,
        _actor: Option<DbId>,
    ) -> Result<Technology, sqlx::Error> {
        let query = format!(
            "WITH t AS ( \
                INSERT INTO technologies (name, icon_url) VALUES ($1, $2) RETURNING * \
             ) \
             SELECT {COLUMNS} FROM t"
        );
        sqlx::query_as::<_, Technology>(&query)
            .bind(&input.name)
            .bind(&input.icon_url)
            .fetch_one(pool)
            .await
    }

    async fn update(
        pool: &PgPool,
        id: &DbId,
        input: &UpdateTechnology,
    ) -> Result<Option<Technology>, sqlx::Error> {
        let query = format!(
            "WITH t AS ( \
                UPDATE technologies SET \
                    name = COALESCE($2, name), \
                    icon_url = COALESCE($3, icon_url), \
                    updated_at = NOW() \
                WHERE id = $1 \
                RETURNING * \
             ) \
             SELECT {COLUMNS} FROM t"
        );
        sqlx::query_as::<_, Technology>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.icon_url)
            .fetch_optional(pool)
            .await
    }

    /// Removing a technology also unlinks it from every project.
    async fn delete(pool: &PgPool, id: &DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM technologies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
