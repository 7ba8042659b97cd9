//! Repository for the `users` table.
//!
//! Password hashing happens in the API layer; this module only stores and
//! returns argon2 PHC strings. Emails are stored lowercased and matched
//! case-insensitively.

use folio_core::pagination::{non_blank, search_pattern, ListQuery, Page};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User, UserFilter, UserSort, UserWithHash};

/// Public column list (aliased `u`), never including the hash.
const COLUMNS: &str = "u.id, u.email, u.name, u.role, u.is_active, u.created_at, u.updated_at";

/// Column list for credential checks.
const COLUMNS_WITH_HASH: &str =
    "u.id, u.email, u.name, u.role, u.is_active, u.password_hash, u.created_at, u.updated_at";

/// `$1` role, `$2` search pattern.
const FILTER: &str = "($1::TEXT IS NULL OR u.role = $1) \
    AND ($2::TEXT IS NULL OR u.name ILIKE $2 OR u.email ILIKE $2)";

pub struct UserRepo;

impl UserRepo {
    pub async fn list(
        pool: &PgPool,
        query: &ListQuery<UserFilter, UserSort>,
    ) -> Result<Page<User>, sqlx::Error> {
        let role = non_blank(query.filter.role.as_deref());
        let pattern = search_pattern(query.filter.q.as_deref());

        let count_sql = format!("SELECT COUNT(*) FROM users u WHERE {FILTER}");
        let page_sql = format!(
            "SELECT {COLUMNS} FROM users u WHERE {FILTER} \
             ORDER BY {}, u.id LIMIT $3 OFFSET $4",
            query.sort.order_by()
        );

        let count = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(role)
            .bind(&pattern)
            .fetch_one(pool);
        let rows = sqlx::query_as::<_, User>(&page_sql)
            .bind(role)
            .bind(&pattern)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users u WHERE u.id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up a user with their hash by email, for login.
    pub async fn find_by_email_with_hash(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<UserWithHash>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS_WITH_HASH} FROM users u WHERE LOWER(u.email) = LOWER($1)");
        sqlx::query_as::<_, UserWithHash>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Look up a user with their hash by id, for password changes.
    pub async fn find_by_id_with_hash(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UserWithHash>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS_WITH_HASH} FROM users u WHERE u.id = $1");
        sqlx::query_as::<_, UserWithHash>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a user. A duplicate email fails with a unique violation.
    pub async fn create(
        pool: &PgPool,
        input: &CreateUser,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users AS u (email, name, password_hash, role, is_active) \
             VALUES (LOWER($1), $2, $3, COALESCE($4, 'viewer'), COALESCE($5, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.name)
            .bind(password_hash)
            .bind(&input.role)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Apply the present fields of `input`; `password_hash` replaces the
    /// stored hash when given.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users AS u SET \
                email = COALESCE(LOWER($2), u.email), \
                name = COALESCE($3, u.name), \
                password_hash = COALESCE($4, u.password_hash), \
                role = COALESCE($5, u.role), \
                is_active = COALESCE($6, u.is_active), \
                updated_at = NOW() \
             WHERE u.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.name)
            .bind(password_hash)
            .bind(&input.role)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Replace a user's password hash. Returns `true` if the user exists.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user. Their blog posts keep existing without an author.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
