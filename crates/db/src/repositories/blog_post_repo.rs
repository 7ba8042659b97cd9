//! Repository for the `blog_posts` table and its tags.

use async_trait::async_trait;
use folio_core::pagination::{non_blank, search_pattern, ListQuery, Page};
use folio_core::slug::slugify;
use folio_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::blog::{
    BlogPost, BlogPostFilter, BlogPostSort, CreateBlogPost, UpdateBlogPost,
};
use crate::repositories::relations::{replace_names, POST_TAGS};
use crate::repositories::resource::Resource;

const COLUMNS: &str = "\
    bp.id, bp.title, bp.slug, bp.excerpt, bp.content, bp.cover_image, \
    bp.category_id, bc.name AS category_name, bp.author_id, u.name AS author_name, \
    bp.status, bp.published_at, \
    ARRAY(SELECT t.name FROM blog_post_tags pt \
          JOIN blog_tags t ON t.id = pt.tag_id \
          WHERE pt.post_id = bp.id ORDER BY LOWER(t.name)) AS tags, \
    bp.created_at, bp.updated_at";

const FROM: &str = "blog_posts bp \
    LEFT JOIN blog_categories bc ON bc.id = bp.category_id \
    LEFT JOIN users u ON u.id = bp.author_id";

/// `$1` category slug, `$2` tag, `$3` status, `$4` author, `$5` search.
const FILTER: &str = "\
    ($1::TEXT IS NULL OR bc.slug = $1) \
    AND ($2::TEXT IS NULL OR EXISTS ( \
        SELECT 1 FROM blog_post_tags pt \
        JOIN blog_tags t ON t.id = pt.tag_id \
        WHERE pt.post_id = bp.id AND LOWER(t.name) = LOWER($2))) \
    AND ($3::TEXT IS NULL OR bp.status = $3) \
    AND ($4::BIGINT IS NULL OR bp.author_id = $4) \
    AND ($5::TEXT IS NULL OR bp.title ILIKE $5 OR bp.excerpt ILIKE $5)";

pub struct BlogPostRepo;

impl BlogPostRepo {
    /// Find a post by its public slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE bp.slug = $1");
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    async fn fetch<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE bp.id = $1");
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}

#[async_trait]
impl Resource for BlogPostRepo {
    const ENTITY: &'static str = "BlogPost";

    type Id = DbId;
    type Record = BlogPost;
    type Create = CreateBlogPost;
    type Update = UpdateBlogPost;
    type Filter = BlogPostFilter;
    type Sort = BlogPostSort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<BlogPostFilter, BlogPostSort>,
    ) -> Result<Page<BlogPost>, sqlx::Error> {
        let filter = &query.filter;
        let category = non_blank(filter.category.as_deref());
        let tag = non_blank(filter.tag.as_deref());
        let status = non_blank(filter.status.as_deref());
        let pattern = search_pattern(filter.q.as_deref());

        let count_sql = format!("SELECT COUNT(*) FROM {FROM} WHERE {FILTER}");
        let page_sql = format!(
            "SELECT {COLUMNS} FROM {FROM} WHERE {FILTER} \
             ORDER BY {} NULLS LAST, bp.id LIMIT $6 OFFSET $7",
            query.sort.order_by()
        );

        let count = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(category)
            .bind(tag)
            .bind(status)
            .bind(filter.author_id)
            .bind(&pattern)
            .fetch_one(pool);
        let rows = sqlx::query_as::<_, BlogPost>(&page_sql)
            .bind(category)
            .bind(tag)
            .bind(status)
            .bind(filter.author_id)
            .bind(&pattern)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &DbId) -> Result<Option<BlogPost>, sqlx::Error> {
        Self::fetch(pool, *id).await
    }

    /// `actor` becomes the author. Publishing stamps `published_at`.
    async fn create(
        pool: &PgPool,
        input: &CreateBlogPost,
        actor: Option<DbId>,
    ) -> Result<BlogPost, sqlx::Error> {
        let slug = input
            .slug
            .clone()
            .or_else(|| input.title.as_deref().map(slugify));

        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO blog_posts \
                (title, slug, excerpt, content, cover_image, category_id, author_id, \
                 status, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'draft'), \
                     CASE WHEN $8 = 'published' THEN NOW() END) \
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&slug)
        .bind(&input.excerpt)
        .bind(&input.content)
        .bind(&input.cover_image)
        .bind(input.category_id)
        .bind(actor)
        .bind(&input.status)
        .fetch_one(&mut *tx)
        .await?;

        replace_names(&mut tx, &POST_TAGS, id, &input.tags).await?;

        let post = Self::fetch(&mut *tx, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;
        Ok(post)
    }

    /// Moving to `published` stamps `published_at` once; moving back to
    /// `draft` clears it.
    async fn update(
        pool: &PgPool,
        id: &DbId,
        input: &UpdateBlogPost,
    ) -> Result<Option<BlogPost>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE blog_posts SET \
                title = COALESCE($2, title), \
                slug = COALESCE($3, slug), \
                excerpt = COALESCE($4, excerpt), \
                content = COALESCE($5, content), \
                cover_image = COALESCE($6, cover_image), \
                category_id = COALESCE($7, category_id), \
                status = COALESCE($8, status), \
                published_at = CASE \
                    WHEN COALESCE($8, status) = 'published' THEN COALESCE(published_at, NOW()) \
                    ELSE NULL END, \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.excerpt)
        .bind(&input.content)
        .bind(&input.cover_image)
        .bind(input.category_id)
        .bind(&input.status)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(tags) = &input.tags {
            replace_names(&mut tx, &POST_TAGS, *id, tags).await?;
        }

        let post = Self::fetch(&mut *tx, *id).await?;
        tx.commit().await?;
        Ok(post)
    }

    async fn delete(pool: &PgPool, id: &DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
