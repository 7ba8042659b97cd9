//! The data-access contract shared by every structurally uniform resource.
//!
//! A [`Resource`] is a zero-sized repository whose records can be listed,
//! fetched, created, patched and deleted by a single id. The HTTP layer
//! mounts one generic set of handlers over any implementor; per-resource
//! rules stay in the associated DTO, filter and sort types.

use std::fmt::{Debug, Display};

use async_trait::async_trait;
use folio_core::pagination::{ListQuery, Page};
use folio_core::sort::SortField;
use folio_core::types::DbId;
use folio_core::validation::Payload;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::PgPool;

/// Rows that still reference an entity and block its deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependents {
    /// Human-readable refusal, e.g. "Cannot delete category with existing projects".
    pub message: &'static str,
    /// JSON key carrying `count` in the error body, e.g. `projectCount`.
    pub count_key: &'static str,
    pub count: i64,
}

#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// Entity name used in "not found" messages and logs.
    const ENTITY: &'static str;

    type Id: DeserializeOwned + Display + Debug + Send + Sync + 'static;
    type Record: Serialize + Send + Sync + 'static;
    type Create: Payload + Send + Sync + 'static;
    type Update: Payload + Send + Sync + 'static;
    type Filter: DeserializeOwned + Default + Send + Sync + 'static;
    type Sort: SortField;

    /// One page of records plus the total matching `query.filter`.
    async fn list(
        pool: &PgPool,
        query: &ListQuery<Self::Filter, Self::Sort>,
    ) -> Result<Page<Self::Record>, sqlx::Error>;

    async fn find_by_id(pool: &PgPool, id: &Self::Id)
        -> Result<Option<Self::Record>, sqlx::Error>;

    /// Insert a record. `actor` is the authenticated user, if any.
    async fn create(
        pool: &PgPool,
        input: &Self::Create,
        actor: Option<DbId>,
    ) -> Result<Self::Record, sqlx::Error>;

    /// Apply the present fields of `input`. Returns `None` if no row matched.
    async fn update(
        pool: &PgPool,
        id: &Self::Id,
        input: &Self::Update,
    ) -> Result<Option<Self::Record>, sqlx::Error>;

    /// Returns `true` if a row was removed.
    async fn delete(pool: &PgPool, id: &Self::Id) -> Result<bool, sqlx::Error>;

    /// Rows that must be removed before this entity may be deleted.
    async fn dependents(
        _pool: &PgPool,
        _id: &Self::Id,
    ) -> Result<Option<Dependents>, sqlx::Error> {
        Ok(None)
    }
}

/// Build [`Dependents`] only when `count` is non-zero.
pub(crate) fn dependents_if_any(
    count: i64,
    message: &'static str,
    count_key: &'static str,
) -> Option<Dependents> {
    (count > 0).then_some(Dependents {
        message,
        count_key,
        count,
    })
}
