//! Technologies attached to projects.

use folio_core::types::{DbId, Timestamp};
use folio_core::validation::Payload;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `technologies` table with its usage count.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Technology {
    pub id: DbId,
    pub name: String,
    pub icon_url: Option<String>,
    /// Computed at read time from `project_technologies`.
    pub project_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTechnology {
    #[validate(required, length(min = 1, max = 60))]
    pub name: Option<String>,
    #[validate(url)]
    pub icon_url: Option<String>,
}

impl Payload for CreateTechnology {}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTechnology {
    #[validate(length(min = 1, max = 60))]
    pub name: Option<String>,
    #[validate(url)]
    pub icon_url: Option<String>,
}

impl Payload for UpdateTechnology {
    const PARTIAL: bool = true;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TechnologyFilter {
    pub q: Option<String>,
}

folio_core::sort_fields! {
    pub enum TechnologySort {
        Name => ("name", "t.name"),
        ProjectCount => ("project_count", "project_count"),
        CreatedAt => ("created_at", "t.created_at"),
    }
    default = (Name, Asc);
}
