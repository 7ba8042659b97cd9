//! Team member profiles.

use folio_core::pagination::blank_as_none;
use folio_core::types::{DbId, Timestamp};
use folio_core::validation::Payload;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `team_members` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct TeamMember {
    pub id: DbId,
    pub name: String,
    pub position: String,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTeamMember {
    #[validate(required, length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(required, length(min = 1, max = 100))]
    pub position: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(url)]
    pub photo_url: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub github_url: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl Payload for CreateTeamMember {}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTeamMember {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub position: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(url)]
    pub photo_url: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub github_url: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl Payload for UpdateTeamMember {
    const PARTIAL: bool = true;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamMemberFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_active: Option<bool>,
    /// Free text over name and position.
    pub q: Option<String>,
}

folio_core::sort_fields! {
    pub enum TeamMemberSort {
        Name => ("name", "tm.name"),
        SortOrder => ("sort_order", "tm.sort_order"),
        CreatedAt => ("created_at", "tm.created_at"),
    }
    default = (SortOrder, Asc);
}
