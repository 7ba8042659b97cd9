//! "About" page sections and timeline milestones.

use folio_core::pagination::blank_as_none;
use folio_core::types::{DbId, Timestamp};
use folio_core::validation::Payload;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// A row from the `about_sections` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AboutSection {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAboutSection {
    #[validate(required, length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub content: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub sort_order: Option<i32>,
}

impl Payload for CreateAboutSection {}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateAboutSection {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub sort_order: Option<i32>,
}

impl Payload for UpdateAboutSection {
    const PARTIAL: bool = true;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AboutSectionFilter {
    pub q: Option<String>,
}

folio_core::sort_fields! {
    pub enum AboutSectionSort {
        Title => ("title", "a.title"),
        SortOrder => ("sort_order", "a.sort_order"),
        CreatedAt => ("created_at", "a.created_at"),
    }
    default = (SortOrder, Asc);
}

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

/// A row from the `about_milestones` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Milestone {
    pub id: DbId,
    pub year: i32,
    pub title: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMilestone {
    #[validate(required, range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[validate(required, length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl Payload for CreateMilestone {}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateMilestone {
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl Payload for UpdateMilestone {
    const PARTIAL: bool = true;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MilestoneFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub year: Option<i32>,
}

folio_core::sort_fields! {
    pub enum MilestoneSort {
        Year => ("year", "m.year"),
        Title => ("title", "m.title"),
        CreatedAt => ("created_at", "m.created_at"),
    }
    default = (Year, Asc);
}
