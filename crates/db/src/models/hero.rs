//! Landing-page hero sections.

use folio_core::pagination::blank_as_none;
use folio_core::types::{DbId, Timestamp};
use folio_core::validation::Payload;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `hero_sections` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct HeroSection {
    pub id: DbId,
    pub title: String,
    pub subtitle: Option<String>,
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
    pub background_image: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateHeroSection {
    #[validate(required, length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub subtitle: Option<String>,
    #[validate(length(max = 50))]
    pub cta_text: Option<String>,
    #[validate(url)]
    pub cta_url: Option<String>,
    #[validate(url)]
    pub background_image: Option<String>,
    pub is_active: Option<bool>,
}

impl Payload for CreateHeroSection {}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateHeroSection {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub subtitle: Option<String>,
    #[validate(length(max = 50))]
    pub cta_text: Option<String>,
    #[validate(url)]
    pub cta_url: Option<String>,
    #[validate(url)]
    pub background_image: Option<String>,
    pub is_active: Option<bool>,
}

impl Payload for UpdateHeroSection {
    const PARTIAL: bool = true;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeroSectionFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_active: Option<bool>,
}

folio_core::sort_fields! {
    pub enum HeroSectionSort {
        Title => ("title", "h.title"),
        CreatedAt => ("created_at", "h.created_at"),
        UpdatedAt => ("updated_at", "h.updated_at"),
    }
    default = (UpdatedAt, Desc);
}
