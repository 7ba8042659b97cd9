//! Repository for the `statistics` table.

use async_trait::async_trait;
use folio_core::pagination::{search_pattern, ListQuery, Page};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::statistic::{
    CreateStatistic, Statistic, StatisticFilter, StatisticSort, UpdateStatistic,
};
use crate::repositories::resource::Resource;

const COLUMNS: &str =
    "s.id, s.label, s.value, s.suffix, s.icon, s.sort_order, s.created_at, s.updated_at";

pub struct StatisticRepo;

#[async_trait]
impl Resource for StatisticRepo {
    const ENTITY: &'static str = "Statistic";

    type Id = DbId;
    type Record = Statistic;
    type Create = CreateStatistic;
    type Update = UpdateStatistic;
    type Filter = StatisticFilter;
    type Sort = StatisticSort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<StatisticFilter, StatisticSort>,
    ) -> Result<Page<Statistic>, sqlx::Error> {
        let pattern = search_pattern(query.filter.q.as_deref());

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM statistics s WHERE ($1::TEXT IS NULL OR s.label ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(pool);

        let page_sql = format!(
            "SELECT {COLUMNS} FROM statistics s \
             WHERE ($1::TEXT IS NULL OR s.label ILIKE $1) \
             ORDER BY {}, s.id LIMIT $2 OFFSET $3",
            query.sort.order_by()
        );
        let rows = sqlx::query_as::<_, Statistic>(&page_sql)
            .bind(&pattern)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &DbId) -> Result<Option<Statistic>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM statistics s WHERE s.id = $1");
        sqlx::query_as::<_, Statistic>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn create(
        pool: &PgPool,
        input: &CreateStatistic,
        _actor: Option<DbId>,
    ) -> Result<Statistic, sqlx::Error> {
        let query = format!(
            "INSERT INTO statistics AS s (label, value, suffix, icon, sort_order) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 0)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Statistic>(&query)
            .bind(&input.label)
            .bind(input.value)
            .bind(&input.suffix)
            .bind(&input.icon)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    async fn update(
        pool: &PgPool,
        id: &DbId,
        input: &UpdateStatistic,
    ) -> Result<Option<Statistic>, sqlx::Error> {
        let query = format!(
            "UPDATE statistics AS s SET \
                label = COALESCE($2, s.label), \
                value = COALESCE($3, s.value), \
                suffix = COALESCE($4, s.suffix), \
                icon = COALESCE($5, s.icon), \
                sort_order = COALESCE($6, s.sort_order), \
                updated_at = NOW() \
             WHERE s.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Statistic>(&query)
            .bind(id)
            .bind(&input.label)
            .bind(input.value)
            .bind(&input.suffix)
            .bind(&input.icon)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    async fn delete(pool: &PgPool, id: &DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM statistics WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
