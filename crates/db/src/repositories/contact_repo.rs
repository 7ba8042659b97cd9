//! Repository for the `contacts` table.

use async_trait::async_trait;
use folio_core::pagination::{non_blank, search_pattern, ListQuery, Page};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::contact::{Contact, ContactFilter, ContactSort, CreateContact, UpdateContact};
use crate::repositories::resource::Resource;

const COLUMNS: &str =
    "c.id, c.name, c.email, c.subject, c.message, c.status, c.created_at, c.updated_at";

/// `$1` status, `$2` search pattern.
const FILTER: &str = "($1::TEXT IS NULL OR c.status = $1) \
    AND ($2::TEXT IS NULL OR c.name ILIKE $2 OR c.email ILIKE $2 OR c.subject ILIKE $2)";

pub struct ContactRepo;

#[async_trait]
impl Resource for ContactRepo {
    const ENTITY: &'static str = "Contact";

    type Id = DbId;
    type Record = Contact;
    type Create = CreateContact;
    type Update = UpdateContact;
    type Filter = ContactFilter;
    type Sort = ContactSort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<ContactFilter, ContactSort>,
    ) -> Result<Page<Contact>, sqlx::Error> {
        let status = non_blank(query.filter.status.as_deref());
        let pattern = search_pattern(query.filter.q.as_deref());

        let count_sql = format!("SELECT COUNT(*) FROM contacts c WHERE {FILTER}");
        let page_sql = format!(
            "SELECT {COLUMNS} FROM contacts c WHERE {FILTER} \
             ORDER BY {}, c.id LIMIT $3 OFFSET $4",
            query.sort.order_by()
        );

        let count = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(status)
            .bind(&pattern)
            .fetch_one(pool);
        let rows = sqlx::query_as::<_, Contact>(&page_sql)
            .bind(status)
            .bind(&pattern)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &DbId) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contacts c WHERE c.id = $1");
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn create(
        pool: &PgPool,
        input: &CreateContact,
        _actor: Option<DbId>,
    ) -> Result<Contact, sqlx::Error> {
        let query = format!(
            "INSERT INTO contacts AS c (name, email, subject, message) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.subject)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    async fn update(
        pool: &PgPool,
        id: &DbId,
        input: &UpdateContact,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "UPDATE contacts AS c SET \
                status = COALESCE($2, c.status), \
                updated_at = NOW() \
             WHERE c.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    async fn delete(pool: &PgPool, id: &DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
