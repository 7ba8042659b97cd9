//! Repository for the `categories` table.
//!
//! `count` is denormalized: project writes adjust it inside their own
//! transaction (see `project_repo`), and [`CategoryRepo::recount`] rebuilds
//! every value from the `projects` table.

use async_trait::async_trait;
use folio_core::pagination::{search_pattern, ListQuery, Page};
use folio_core::slug::slugify;
use folio_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::category::{
    Category, CategoryFilter, CategorySort, CreateCategory, UpdateCategory,
};
use crate::repositories::resource::{dependents_if_any, Dependents, Resource};

const COLUMNS: &str = "c.id, c.name, c.description, c.count, c.created_at, c.updated_at";

pub struct CategoryRepo;

impl CategoryRepo {
    /// Recompute every category's `count` from its projects. Returns the
    /// number of categories whose stored count changed.
    pub async fn recount(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE categories c SET count = actual.n \
             FROM ( \
                 SELECT c2.id, COUNT(p.id)::INTEGER AS n \
                 FROM categories c2 \
                 LEFT JOIN projects p ON p.category_id = c2.id \
                 GROUP BY c2.id \
             ) AS actual \
             WHERE actual.id = c.id AND c.count <> actual.n",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Shift a category's count by `delta`, never below zero.
    pub(crate) async fn adjust_count(
        conn: &mut PgConnection,
        id: &str,
        delta: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE categories SET count = GREATEST(count + $2, 0) WHERE id = $1")
            .bind(id)
            .bind(delta)
            .execute(conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Resource for CategoryRepo {
    const ENTITY: &'static str = "Category";

    type Id = String;
    type Record = Category;
    type Create = CreateCategory;
    type Update = UpdateCategory;
    type Filter = CategoryFilter;
    type Sort = CategorySort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<CategoryFilter, CategorySort>,
    ) -> Result<Page<Category>, sqlx::Error> {
        let pattern = search_pattern(query.filter.q.as_deref());

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories c \
             WHERE ($1::TEXT IS NULL OR c.name ILIKE $1 OR c.id ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(pool);

        let page_sql = format!(
            "SELECT {COLUMNS} FROM categories c \
             WHERE ($1::TEXT IS NULL OR c.name ILIKE $1 OR c.id ILIKE $1) \
             ORDER BY {}, c.id LIMIT $2 OFFSET $3",
            query.sort.order_by()
        );
        let rows = sqlx::query_as::<_, Category>(&page_sql)
            .bind(&pattern)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &String) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories c WHERE c.id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The id is derived from `name` when omitted. A duplicate id or name
    /// fails with a unique violation.
    async fn create(
        pool: &PgPool,
        input: &CreateCategory,
        _actor: Option<DbId>,
    ) -> Result<Category, sqlx::Error> {
        let id = input
            .id
            .clone()
            .or_else(|| input.name.as_deref().map(slugify));

        let query = format!(
            "INSERT INTO categories AS c (id, name, description) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    async fn update(
        pool: &PgPool,
        id: &String,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories AS c SET \
                name = COALESCE($2, c.name), \
                description = COALESCE($3, c.description), \
                updated_at = NOW() \
             WHERE c.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    async fn delete(pool: &PgPool, id: &String) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Counts live rows rather than trusting the stored `count`.
    async fn dependents(pool: &PgPool, id: &String) -> Result<Option<Dependents>, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE category_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(dependents_if_any(
            count,
            "Cannot delete category with existing projects",
            "projectCount",
        ))
    }
}
