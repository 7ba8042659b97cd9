//! Name-keyed many-to-many relations written as whole sets.
//!
//! Target rows (technologies, features, tags) are created on first use and
//! matched case-insensitively through their `LOWER(name)` unique index.
//! Callers pass the open transaction so the owner row and its links commit
//! together.

use folio_core::types::DbId;
use folio_core::validation::dedupe_names;
use sqlx::PgConnection;

/// Table layout of one name-keyed relation.
pub(crate) struct Relation {
    pub target_table: &'static str,
    pub link_table: &'static str,
    pub owner_column: &'static str,
    pub target_column: &'static str,
}

pub(crate) const PROJECT_TECHNOLOGIES: Relation = Relation {
    target_table: "technologies",
    link_table: "project_technologies",
    owner_column: "project_id",
    target_column: "technology_id",
};

pub(crate) const PROJECT_FEATURES: Relation = Relation {
    target_table: "features",
    link_table: "project_features",
    owner_column: "project_id",
    target_column: "feature_id",
};

pub(crate) const POST_TAGS: Relation = Relation {
    target_table: "blog_tags",
    link_table: "blog_post_tags",
    owner_column: "post_id",
    target_column: "tag_id",
};

/// Replace every link of `owner_id` with links to `names`.
pub(crate) async fn replace_names(
    conn: &mut PgConnection,
    relation: &Relation,
    owner_id: DbId,
    names: &[String],
) -> Result<(), sqlx::Error> {
    let Relation {
        target_table,
        link_table,
        owner_column,
        target_column,
    } = relation;

    sqlx::query(&format!("DELETE FROM {link_table} WHERE {owner_column} = $1"))
        .bind(owner_id)
        .execute(&mut *conn)
        .await?;

    let names = dedupe_names(names);
    if names.is_empty() {
        return Ok(());
    }

    // The no-op DO UPDATE makes RETURNING yield ids for existing rows too.
    let upsert = format!(
        "INSERT INTO {target_table} (name) SELECT UNNEST($1::TEXT[]) \
         ON CONFLICT ((LOWER(name))) DO UPDATE SET name = {target_table}.name \
         RETURNING id"
    );
    let ids: Vec<DbId> = sqlx::query_scalar(&upsert)
        .bind(&names)
        .fetch_all(&mut *conn)
        .await?;

    let link = format!(
        "INSERT INTO {link_table} ({owner_column}, {target_column}) \
         SELECT $1, UNNEST($2::BIGINT[]) \
         ON CONFLICT DO NOTHING"
    );
    sqlx::query(&link)
        .bind(owner_id)
        .bind(&ids)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Replace the ordered image list of a project.
pub(crate) async fn replace_project_images(
    conn: &mut PgConnection,
    project_id: DbId,
    urls: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM project_images WHERE project_id = $1")
        .bind(project_id)
        .execute(&mut *conn)
        .await?;

    if urls.is_empty() {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO project_images (project_id, url, sort_order) \
         SELECT $1, u.url, (u.ord - 1)::INTEGER \
         FROM UNNEST($2::TEXT[]) WITH ORDINALITY AS u(url, ord)",
    )
    .bind(project_id)
    .bind(urls)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
