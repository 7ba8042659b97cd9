//! Repository for the `clients` table.

use async_trait::async_trait;
use folio_core::pagination::{non_blank, search_pattern, ListQuery, Page};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::client::{Client, ClientFilter, ClientSort, CreateClient, UpdateClient};
use crate::repositories::resource::Resource;

const COLUMNS: &str =
    "c.id, c.name, c.logo_url, c.website_url, c.industry, c.is_active, c.created_at, c.updated_at";

/// `$1` is_active, `$2` industry, `$3` search pattern.
const FILTER: &str = "($1::BOOLEAN IS NULL OR c.is_active = $1) \
    AND ($2::TEXT IS NULL OR LOWER(c.industry) = LOWER($2)) \
    AND ($3::TEXT IS NULL OR c.name ILIKE $3)";

pub struct ClientRepo;

#[async_trait]
impl Resource for ClientRepo {
    const ENTITY: &'static str = "Client";

    type Id = DbId;
    type Record = Client;
    type Create = CreateClient;
    type Update = UpdateClient;
    type Filter = ClientFilter;
    type Sort = ClientSort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<ClientFilter, ClientSort>,
    ) -> Result<Page<Client>, sqlx::Error> {
        let filter = &query.filter;
        let industry = non_blank(filter.industry.as_deref());
        let pattern = search_pattern(filter.q.as_deref());

        let count_sql = format!("SELECT COUNT(*) FROM clients c WHERE {FILTER}");
        let page_sql = format!(
            "SELECT {COLUMNS} FROM clients c WHERE {FILTER} \
             ORDER BY {}, c.id LIMIT $4 OFFSET $5",
            query.sort.order_by()
        );

        let count = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(filter.is_active)
            .bind(industry)
            .bind(&pattern)
            .fetch_one(pool);
        let rows = sqlx::query_as::<_, Client>(&page_sql)
            .bind(filter.is_active)
            .bind(industry)
            .bind(&pattern)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients c WHERE c.id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn create(
        pool: &PgPool,
        input: &CreateClient,
        _actor: Option<DbId>,
    ) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients AS c (name, logo_url, website_url, industry, is_active) \
             VALUES ($1, $2, $3, $4, COALESCE($5, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.logo_url)
            .bind(&input.website_url)
            .bind(&input.industry)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    async fn update(
        pool: &PgPool,
        id: &DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients AS c SET \
                name = COALESCE($2, c.name), \
                logo_url = COALESCE($3, c.logo_url), \
                website_url = COALESCE($4, c.website_url), \
                industry = COALESCE($5, c.industry), \
                is_active = COALESCE($6, c.is_active), \
                updated_at = NOW() \
             WHERE c.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.logo_url)
            .bind(&input.website_url)
            .bind(&input.industry)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    async fn delete(pool: &PgPool, id: &DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
