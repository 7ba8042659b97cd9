//! Repository for the `blog_tags` table.

use async_trait::async_trait;
use folio_core::pagination::{search_pattern, ListQuery, Page};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::blog::{BlogTag, BlogTagFilter, BlogTagSort, CreateBlogTag, UpdateBlogTag};
use crate::repositories::resource::Resource;

/// Column list (aliased `t`) including the computed usage count.
const COLUMNS: &str = "t.id, t.name, \
    (SELECT COUNT(*) FROM blog_post_tags pt WHERE pt.tag_id = t.id) AS post_count, \
    t.created_at, t.updated_at";

pub struct BlogTagRepo;

#[async_trait]
impl Resource for BlogTagRepo {
    const ENTITY: &'static str = "BlogTag";

    type Id = DbId;
    type Record = BlogTag;
    type Create = CreateBlogTag;
    type Update = UpdateBlogTag;
    type Filter = BlogTagFilter;
    type Sort = BlogTagSort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<BlogTagFilter, BlogTagSort>,
    ) -> Result<Page<BlogTag>, sqlx::Error> {
        let pattern = search_pattern(query.filter.q.as_deref());

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM blog_tags t WHERE ($1::TEXT IS NULL OR t.name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(pool);

        let page_sql = format!(
            "SELECT {COLUMNS} FROM blog_tags t \
             WHERE ($1::TEXT IS NULL OR t.name ILIKE $1) \
             ORDER BY {}, t.id LIMIT $2 OFFSET $3",
            query.sort.order_by()
        );
        let rows = sqlx::query_as::<_, BlogTag>(&page_sql)
            .bind(&pattern)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &DbId) -> Result<Option<BlogTag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blog_tags t WHERE t.id = $1");
        sqlx::query_as::<_, BlogTag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn create(
        pool: &PgPool,
        input: &CreateBlogTag,
        _actor: Option<DbId>,
    ) -> Result<BlogTag, sqlx::Error> {
        let query = format!(
            "WITH t AS (INSERT INTO blog_tags (name) VALUES ($1) RETURNING *) \
             SELECT {COLUMNS} FROM t"
        );
        sqlx::query_as::<_, BlogTag>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    async fn update(
        pool: &PgPool,
        id: &DbId,
        input: &UpdateBlogTag,
    ) -> Result<Option<BlogTag>, sqlx::Error> {
        let query = format!(
            "WITH t AS ( \
                UPDATE blog_tags SET name = COALESCE($2, name), updated_at = NOW() \
                WHERE id = $1 \
                RETURNING * \
             ) \
             SELECT {COLUMNS} FROM t"
        );
        sqlx::query_as::<_, BlogTag>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    async fn delete(pool: &PgPool, id: &DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blog_tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
