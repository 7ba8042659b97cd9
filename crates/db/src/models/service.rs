//! Offered services.

use folio_core::pagination::blank_as_none;
use folio_core::types::{DbId, Timestamp};
use folio_core::validation::Payload;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `services` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Service {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateService {
    #[validate(required, length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(required, length(min = 1, max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub icon: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl Payload for CreateService {}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateService {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub icon: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl Payload for UpdateService {
    const PARTIAL: bool = true;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_active: Option<bool>,
    pub q: Option<String>,
}

folio_core::sort_fields! {
    pub enum ServiceSort {
        Title => ("title", "s.title"),
        SortOrder => ("sort_order", "s.sort_order"),
        CreatedAt => ("created_at", "s.created_at"),
    }
    default = (SortOrder, Asc);
}
