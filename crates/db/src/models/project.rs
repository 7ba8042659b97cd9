//! Portfolio projects.
//!
//! Technologies, features and images are stored in join/child tables but
//! read and written as flat string arrays.

use folio_core::error::FieldError;
use folio_core::pagination::blank_as_none;
use folio_core::types::{DbId, Timestamp};
use folio_core::validation::{
    derived_slug_error, validate_project_status, validate_relation_names, validate_slug,
    validate_url_list, Payload,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project row with its relations flattened.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub status: String,
    pub featured: bool,
    pub cover_image: Option<String>,
    pub live_url: Option<String>,
    pub repo_url: Option<String>,
    pub sort_order: i32,
    /// Technology names, alphabetical.
    pub technologies: Vec<String>,
    /// Feature names, alphabetical.
    pub features: Vec<String>,
    /// Image URLs in display order.
    pub images: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project. `slug` is derived from `title` when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(required, length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 120), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 500))]
    pub summary: Option<String>,
    pub content: Option<String>,
    #[validate(custom(function = "validate_slug"))]
    pub category_id: Option<String>,
    #[validate(custom(function = "validate_project_status"))]
    pub status: Option<String>,
    pub featured: Option<bool>,
    #[validate(url)]
    pub cover_image: Option<String>,
    #[validate(url)]
    pub live_url: Option<String>,
    #[validate(url)]
    pub repo_url: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub sort_order: Option<i32>,
    #[serde(default)]
    #[validate(custom(function = "validate_relation_names"))]
    pub technologies: Vec<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_relation_names"))]
    pub features: Vec<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_url_list"))]
    pub images: Vec<String>,
}

impl Payload for CreateProject {
    fn cross_field_errors(&self) -> Vec<FieldError> {
        derived_slug_error("slug", self.slug.as_deref(), self.title.as_deref(), &[])
            .into_iter()
            .collect()
    }
}

/// DTO for updating a project. A present relation array replaces the whole set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 120), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 500))]
    pub summary: Option<String>,
    pub content: Option<String>,
    #[validate(custom(function = "validate_slug"))]
    pub category_id: Option<String>,
    #[validate(custom(function = "validate_project_status"))]
    pub status: Option<String>,
    pub featured: Option<bool>,
    #[validate(url)]
    pub cover_image: Option<String>,
    #[validate(url)]
    pub live_url: Option<String>,
    #[validate(url)]
    pub repo_url: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub sort_order: Option<i32>,
    #[validate(custom(function = "validate_relation_names"))]
    pub technologies: Option<Vec<String>>,
    #[validate(custom(function = "validate_relation_names"))]
    pub features: Option<Vec<String>>,
    #[validate(custom(function = "validate_url_list"))]
    pub images: Option<Vec<String>>,
}

impl Payload for UpdateProject {
    const PARTIAL: bool = true;
}

/// `GET /projects` filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    /// Category id.
    pub category: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub featured: Option<bool>,
    /// Technology name, case-insensitive.
    pub technology: Option<String>,
    /// Free text over title and summary.
    pub q: Option<String>,
}

folio_core::sort_fields! {
    pub enum ProjectSort {
        Title => ("title", "p.title"),
        Status => ("status", "p.status"),
        SortOrder => ("sort_order", "p.sort_order"),
        CreatedAt => ("created_at", "p.created_at"),
        UpdatedAt => ("updated_at", "p.updated_at"),
    }
    default = (CreatedAt, Desc);
}
