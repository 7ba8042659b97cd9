//! Repository for the `team_members` table.

use async_trait::async_trait;
use folio_core::pagination::{search_pattern, ListQuery, Page};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::team_member::{
    CreateTeamMember, TeamMember, TeamMemberFilter, TeamMemberSort, UpdateTeamMember,
};
use crate::repositories::resource::Resource;

/// Column list for `team_members` queries (aliased `tm`).
const COLUMNS: &str = "tm.id, tm.name, tm.position, tm.bio, tm.photo_url, tm.email, \
    tm.linkedin_url, tm.github_url, tm.sort_order, tm.is_active, tm.created_at, tm.updated_at";

/// `$1` is_active, `$2` search pattern.
const FILTER: &str = "($1::BOOLEAN IS NULL OR tm.is_active = $1) \
    AND ($2::TEXT IS NULL OR tm.name ILIKE $2 OR tm.position ILIKE $2)";

pub struct TeamMemberRepo;

#[async_trait]
impl Resource for TeamMemberRepo {
    const ENTITY: &'static str = "TeamMember";

    type Id = DbId;
    type Record = TeamMember;
    type Create = CreateTeamMember;
    type Update = UpdateTeamMember;
    type Filter = TeamMemberFilter;
    type Sort = TeamMemberSort;

    async fn list(
        pool: &PgPool,
        query: &ListQuery<TeamMemberFilter, TeamMemberSort>,
    ) -> Result<Page<TeamMember>, sqlx::Error> {
        let pattern = search_pattern(query.filter.q.as_deref());

        let count_sql = format!("SELECT COUNT(*) FROM team_members tm WHERE {FILTER}");
        let page_sql = format!(
            "SELECT {COLUMNS} FROM team_members tm WHERE {FILTER} \
             ORDER BY {}, tm.id LIMIT $3 OFFSET $4",
            query.sort.order_by()
        );

        let count = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(query.filter.is_active)
            .bind(&pattern)
            .fetch_one(pool);
        let rows = sqlx::query_as::<_, TeamMember>(&page_sql)
            .bind(query.filter.is_active)
            .bind(&pattern)
            .bind(query.page.limit)
            .bind(query.page.offset())
            .fetch_all(pool);

        let (total, items) = tokio::try_join!(count, rows)?;
        Ok(Page::new(items, query.page, total))
    }

    async fn find_by_id(pool: &PgPool, id: &DbId) -> Result<Option<TeamMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM team_members tm WHERE tm.id = $1");
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn create(
        pool: &PgPool,
        input: &CreateTeamMember,
        _actor: Option<DbId>,
    ) -> Result<TeamMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO team_members AS tm \
                (name, position, bio, photo_url, email, linkedin_url, github_url, \
                 sort_order, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 0), COALESCE($9, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(&input.name)
            .bind(&input.position)
            .bind(&input.bio)
            .bind(&input.photo_url)
            .bind(&input.email)
            .bind(&input.linkedin_url)
            .bind(&input.github_url)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    async fn update(
        pool: &PgPool,
        id: &DbId,
        input: &UpdateTeamMember,
    ) -> Result<Option<TeamMember>, sqlx::Error> {
        let query = format!(
            "UPDATE team_members AS tm SET \
                name = COALESCE($2, tm.name), \
                position = COALESCE($3, tm.position), \
                bio = COALESCE($4, tm.bio), \
                photo_url = COALESCE($5, tm.photo_url), \
                email = COALESCE($6, tm.email), \
                linkedin_url = COALESCE($7, tm.linkedin_url), \
                github_url = COALESCE($8, tm.github_url), \
                sort_order = COALESCE($9, tm.sort_order), \
                is_active = COALESCE($10, tm.is_active), \
                updated_at = NOW() \
             WHERE tm.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamMember>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.position)
            .bind(&input.bio)
            .bind(&input.photo_url)
            .bind(&input.email)
            .bind(&input.linkedin_url)
            .bind(&input.github_url)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    async fn delete(pool: &PgPool, id: &DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
