//! Repository for the `services` table.

use async_trait::async_trait;
use folio_core::pagination::{search_pattern, ListQuery, Page};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::service::{CreateService, Service, ServiceFilter, ServiceSort, UpdateService};
use crate::repositories::resource::Resource;

const COLUMNS: &str =
    "s.id, s.title, s.description, s.icon, s.sort_order, s.is_active, s.created_at, s.updated_at";

/// `$1` is_active, `$2` search pattern.
const FILTER: &str = "($1::BOOLEAN IS NULL OR s.is_active = $1) \
    AND ($2::TEXT IS NULL OR s.title ILIKE $2 OR s.description ILIKE $2)";

pub struct ServiceRepo;

#[async_trait]
impl Resource for ServiceRepo {
    const ENTITY: &'static str = "Service";

    type Id = DbId;
    type Record = Service;
    type Create = CreateService;
    type Update = UpdateService;
    type Filter = ServiceFilter;
    type Sort = ServiceSort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<ServiceFilter, ServiceSort>,
    ) -> Result<Page<Service>, sqlx::Error> {
        let pattern = search_pattern(query.filter.q.as_deref());

        let count_sql = format!("SELECT COUNT(*) FROM services s WHERE {FILTER}");
        let page_sql = format!(
            "SELECT {COLUMNS} FROM services s WHERE {FILTER} \
             ORDER BY {}, s.id LIMIT $3 OFFSET $4",
            query.sort.order_by()
        );

        let count = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(query.filter.is_active)
            .bind(&pattern)
            .fetch_one(pool);
        let rows = sqlx::query_as::<_, Service>(&page_sql)
            .bind(query.filter.is_active)
            .bind(&pattern)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &DbId) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services s WHERE s.id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn create(
        pool: &PgPool,
        input: &CreateService,
        _actor: Option<DbId>,
    ) -> Result<Service, sqlx::Error> {
        let query = format!(
            "INSERT INTO services AS s (title, description, icon, sort_order, is_active) \
             VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    async fn update(
        pool: &PgPool,
        id: &DbId,
        input: &UpdateService,
    ) -> Result<Option<Service>, sqlx::Error> {
        let query = format!(
            "UPDATE services AS s SET \
                title = COALESCE($2, s.title), \
                description = COALESCE($3, s.description), \
                icon = COALESCE($4, s.icon), \
                sort_order = COALESCE($5, s.sort_order), \
                is_active = COALESCE($6, s.is_active), \
                updated_at = NOW() \
             WHERE s.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.icon)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    async fn delete(pool: &PgPool, id: &DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
