//! Project categories, keyed by a slug id.

use folio_core::error::FieldError;
use folio_core::types::Timestamp;
use folio_core::validation::{
    derived_slug_error, validate_category_id, Payload, RESERVED_CATEGORY_IDS,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `categories` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Number of projects in this category.
    pub count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category. `id` is derived from `name` when omitted;
/// ids shadowed by static routes are refused either way.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    #[validate(length(max = 120), custom(function = "validate_category_id"))]
    pub id: Option<String>,
    #[validate(required, length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl Payload for CreateCategory {
    fn cross_field_errors(&self) -> Vec<FieldError> {
        derived_slug_error(
            "id",
            self.id.as_deref(),
            self.name.as_deref(),
            RESERVED_CATEGORY_IDS,
        )
        .into_iter()
        .collect()
    }
}

/// DTO for updating a category. The id is immutable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl Payload for UpdateCategory {
    const PARTIAL: bool = true;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryFilter {
    pub q: Option<String>,
}

folio_core::sort_fields! {
    pub enum CategorySort {
        Name => ("name", "c.name"),
        Count => ("count", "c.count"),
        CreatedAt => ("created_at", "c.created_at"),
    }
    default = (Name, Asc);
}
