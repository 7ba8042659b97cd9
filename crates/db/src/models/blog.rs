//! Blog posts, blog categories and tags.

use folio_core::error::FieldError;
use folio_core::pagination::blank_as_none;
use folio_core::types::{DbId, Timestamp};
use folio_core::validation::{
    derived_slug_error, validate_post_status, validate_relation_names, validate_slug, Payload,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// A blog post with its tags flattened and its category/author names joined.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct BlogPost {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub author_id: Option<DbId>,
    pub author_name: Option<String>,
    pub status: String,
    pub published_at: Option<Timestamp>,
    /// Tag names, alphabetical.
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a post. The author is the authenticated user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBlogPost {
    #[validate(required, length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 120), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 500))]
    pub excerpt: Option<String>,
    #[validate(required, length(min = 1))]
    pub content: Option<String>,
    #[validate(url)]
    pub cover_image: Option<String>,
    #[validate(range(min = 1))]
    pub category_id: Option<DbId>,
    #[validate(custom(function = "validate_post_status"))]
    pub status: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_relation_names"))]
    pub tags: Vec<String>,
}

impl Payload for CreateBlogPost {
    fn cross_field_errors(&self) -> Vec<FieldError> {
        derived_slug_error("slug", self.slug.as_deref(), self.title.as_deref(), &[])
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateBlogPost {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 120), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 500))]
    pub excerpt: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    #[validate(url)]
    pub cover_image: Option<String>,
    #[validate(range(min = 1))]
    pub category_id: Option<DbId>,
    #[validate(custom(function = "validate_post_status"))]
    pub status: Option<String>,
    #[validate(custom(function = "validate_relation_names"))]
    pub tags: Option<Vec<String>>,
}

impl Payload for UpdateBlogPost {
    const PARTIAL: bool = true;
}

/// `GET /blogs/posts` filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPostFilter {
    /// Blog category slug.
    pub category: Option<String>,
    /// Tag name, case-insensitive.
    pub tag: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub author_id: Option<DbId>,
    /// Free text over title and excerpt.
    pub q: Option<String>,
}

folio_core::sort_fields! {
    pub enum BlogPostSort {
        Title => ("title", "bp.title"),
        PublishedAt => ("published_at", "bp.published_at"),
        CreatedAt => ("created_at", "bp.created_at"),
        UpdatedAt => ("updated_at", "bp.updated_at"),
    }
    default = (CreatedAt, Desc);
}

// ---------------------------------------------------------------------------
// Blog categories
// ---------------------------------------------------------------------------

/// A row from `blog_categories` with its post count.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct BlogCategory {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub post_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBlogCategory {
    #[validate(required, length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 120), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl Payload for CreateBlogCategory {
    fn cross_field_errors(&self) -> Vec<FieldError> {
        derived_slug_error("slug", self.slug.as_deref(), self.name.as_deref(), &[])
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateBlogCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 120), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl Payload for UpdateBlogCategory {
    const PARTIAL: bool = true;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogCategoryFilter {
    pub q: Option<String>,
}

folio_core::sort_fields! {
    pub enum BlogCategorySort {
        Name => ("name", "bc.name"),
        PostCount => ("post_count", "post_count"),
        CreatedAt => ("created_at", "bc.created_at"),
    }
    default = (Name, Asc);
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// A row from `blog_tags` with its usage count.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct BlogTag {
    pub id: DbId,
    pub name: String,
    pub post_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBlogTag {
    #[validate(required, length(min = 1, max = 60))]
    pub name: Option<String>,
}

impl Payload for CreateBlogTag {}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateBlogTag {
    #[validate(length(min = 1, max = 60))]
    pub name: Option<String>,
}

impl Payload for UpdateBlogTag {
    const PARTIAL: bool = true;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogTagFilter {
    pub q: Option<String>,
}

folio_core::sort_fields! {
    pub enum BlogTagSort {
        Name => ("name", "t.name"),
        PostCount => ("post_count", "post_count"),
        CreatedAt => ("created_at", "t.created_at"),
    }
    default = (Name, Asc);
}
