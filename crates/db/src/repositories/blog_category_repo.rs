//! Repository for the `blog_categories` table.

use async_trait::async_trait;
use folio_core::pagination::{search_pattern, ListQuery, Page};
use folio_core::slug::slugify;
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::blog::{
    BlogCategory, BlogCategoryFilter, BlogCategorySort, CreateBlogCategory, UpdateBlogCategory,
};
use crate::repositories::resource::{dependents_if_any, Dependents, Resource};

/// Column list (aliased `bc`) including the computed post count.
const COLUMNS: &str = "bc.id, bc.name, bc.slug, bc.description, \
    (SELECT COUNT(*) FROM blog_posts bp WHERE bp.category_id = bc.id) AS post_count, \
    bc.created_at, bc.updated_at";

pub struct BlogCategoryRepo;

#[async_trait]
impl Resource for BlogCategoryRepo {
    const ENTITY: &'static str = "BlogCategory";

    type Id = DbId;
    type Record = BlogCategory;
    type Create = CreateBlogCategory;
    type Update = UpdateBlogCategory;
    type Filter = BlogCategoryFilter;
    type Sort = BlogCategorySort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<BlogCategoryFilter, BlogCategorySort>,
    ) -> Result<Page<BlogCategory>, sqlx::Error> {
        let pattern = search_pattern(query.filter.q.as_deref());

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM blog_categories bc \
             WHERE ($1::TEXT IS NULL OR bc.name ILIKE $1 OR bc.slug ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(pool);

        let page_sql = format!(
            "SELECT {COLUMNS} FROM blog_categories bc \
             WHERE ($1::TEXT IS NULL OR bc.name ILIKE $1 OR bc.slug ILIKE $1) \
             ORDER BY {}, bc.id LIMIT $2 OFFSET $3",
            query.sort.order_by()
        );
        let rows = sqlx::query_as::<_, BlogCategory>(&page_sql)
            .bind(&pattern)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &DbId) -> Result<Option<BlogCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM blog_categories bc WHERE bc.id = $1");
        sqlx::query_as::<_, BlogCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The slug is derived from `name` when omitted.
    async fn create(
        pool: &PgPool,
        input: &CreateBlogCategory,
        _actor: Option<DbId>,
    ) -> Result<BlogCategory, sqlx::Error> {
        let slug = input
            .slug
            .clone()
            .or_else(|| input.name.as_deref().map(slugify));

        let query = format!(
            "WITH bc AS ( \
                INSERT INTO blog_categories (name, slug, description) VALUES ($1, $2, $3) \
                RETURNING * \
             ) \
             SELECT {COLUMNS} FROM bc"
        );
        sqlx::query_as::<_, BlogCategory>(&query)
            .bind(&input.name)
            .bind(&slug)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    async fn update(
        pool: &PgPool,
        id: &DbId,
        input: &UpdateBlogCategory,
    ) -> Result<Option<BlogCategory>, sqlx::Error> {
        let query = format!(
            "WITH bc AS ( \
                UPDATE blog_categories SET \
                    name = COALESCE($2, name), \
                    slug = COALESCE($3, slug), \
                    description = COALESCE($4, description), \
                    updated_at = NOW() \
                WHERE id = $1 \
                RETURNING * \
             ) \
             SELECT {COLUMNS} FROM bc"
        );
        sqlx::query_as::<_, BlogCategory>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    async fn delete(pool: &PgPool, id: &DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blog_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn dependents(pool: &PgPool, id: &DbId) -> Result<Option<Dependents>, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blog_posts WHERE category_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(dependents_if_any(
            count,
            "Cannot delete blog category with existing posts",
            "postCount",
        ))
    }
}
