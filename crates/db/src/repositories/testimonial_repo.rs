//! Repository for the `testimonials` table.

use async_trait::async_trait;
use folio_core::pagination::{search_pattern, ListQuery, Page};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::testimonial::{
    CreateTestimonial, Testimonial, TestimonialFilter, TestimonialSort, UpdateTestimonial,
};
use crate::repositories::resource::Resource;

const COLUMNS: &str = "t.id, t.client_name, t.client_role, t.company, t.content, t.rating, \
    t.avatar_url, t.is_featured, t.created_at, t.updated_at";

/// `$1` is_featured, `$2` minimum rating, `$3` search pattern.
const FILTER: &str = "($1::BOOLEAN IS NULL OR t.is_featured = $1) \
    AND ($2::INTEGER IS NULL OR t.rating >= $2) \
    AND ($3::TEXT IS NULL OR t.client_name ILIKE $3 OR t.company ILIKE $3 \
         OR t.content ILIKE $3)";

pub struct TestimonialRepo;

#[async_trait]
impl Resource for TestimonialRepo {
    const ENTITY: &'static str = "Testimonial";

    type Id = DbId;
    type Record = Testimonial;
    type Create = CreateTestimonial;
    type Update = UpdateTestimonial;
    type Filter = TestimonialFilter;
    type Sort = TestimonialSort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<TestimonialFilter, TestimonialSort>,
    ) -> Result<Page<Testimonial>, sqlx::Error> {
        let filter = &query.filter;
        let pattern = search_pattern(filter.q.as_deref());

        let count_sql = format!("SELECT COUNT(*) FROM testimonials t WHERE {FILTER}");
        let page_sql = format!(
            "SELECT {COLUMNS} FROM testimonials t WHERE {FILTER} \
             ORDER BY {}, t.id LIMIT $4 OFFSET $5",
            query.sort.order_by()
        );

        let count = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(filter.is_featured)
            .bind(filter.min_rating)
            .bind(&pattern)
            .fetch_one(pool);
        let rows = sqlx::query_as::<_, Testimonial>(&page_sql)
            .bind(filter.is_featured)
            .bind(filter.min_rating)
            .bind(&pattern)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &DbId) -> Result<Option<Testimonial>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM testimonials t WHERE t.id = $1");
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn create(
        pool: &PgPool,
        input: &CreateTestimonial,
        _actor: Option<DbId>,
    ) -> Result<Testimonial, sqlx::Error> {
        let query = format!(
            "INSERT INTO testimonials AS t \
                (client_name, client_role, company, content, rating, avatar_url, is_featured) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 5), $6, COALESCE($7, false)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(&input.client_name)
            .bind(&input.client_role)
            .bind(&input.company)
            .bind(&input.content)
            .bind(input.rating)
            .bind(&input.avatar_url)
            .bind(input.is_featured)
            .fetch_one(pool)
            .await
    }

    async fn update(
        pool: &PgPool,
        id: &DbId,
        input: &UpdateTestimonial,
    ) -> Result<Option<Testimonial>, sqlx::Error> {
        let query = format!(
            "UPDATE testimonials AS t SET \
                client_name = COALESCE($2, t.client_name), \
                client_role = COALESCE($3, t.client_role), \
                company = COALESCE($4, t.company), \
                content = COALESCE($5, t.content), \
                rating = COALESCE($6, t.rating), \
                avatar_url = COALESCE($7, t.avatar_url), \
                is_featured = COALESCE($8, t.is_featured), \
                updated_at = NOW() \
             WHERE t.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(id)
            .bind(&input.client_name)
            .bind(&input.client_role)
            .bind(&input.company)
            .bind(&input.content)
            .bind(input.rating)
            .bind(&input.avatar_url)
            .bind(input.is_featured)
            .fetch_optional(pool)
            .await
    }

    async fn delete(pool: &PgPool, id: &DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
