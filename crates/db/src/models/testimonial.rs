//! Client testimonials.

use folio_core::pagination::blank_as_none;
use folio_core::types::{DbId, Timestamp};
use folio_core::validation::Payload;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `testimonials` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Testimonial {
    pub id: DbId,
    pub client_name: String,
    pub client_role: Option<String>,
    pub company: Option<String>,
    pub content: String,
    /// 1..=5
    pub rating: i32,
    pub avatar_url: Option<String>,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTestimonial {
    #[validate(required, length(min = 1, max = 100))]
    pub client_name: Option<String>,
    #[validate(length(max = 100))]
    pub client_role: Option<String>,
    #[validate(length(max = 100))]
    pub company: Option<String>,
    #[validate(required, length(min = 1, max = 2000))]
    pub content: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[validate(url)]
    pub avatar_url: Option<String>,
    pub is_featured: Option<bool>,
}

impl Payload for CreateTestimonial {}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTestimonial {
    #[validate(length(min = 1, max = 100))]
    pub client_name: Option<String>,
    #[validate(length(max = 100))]
    pub client_role: Option<String>,
    #[validate(length(max = 100))]
    pub company: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub content: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[validate(url)]
    pub avatar_url: Option<String>,
    pub is_featured: Option<bool>,
}

impl Payload for UpdateTestimonial {
    const PARTIAL: bool = true;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestimonialFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_featured: Option<bool>,
    /// Minimum rating.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_rating: Option<i32>,
    /// Free text over client name, company and content.
    pub q: Option<String>,
}

folio_core::sort_fields! {
    pub enum TestimonialSort {
        ClientName => ("client_name", "t.client_name"),
        Rating => ("rating", "t.rating"),
        CreatedAt => ("created_at", "t.created_at"),
    }
    default = (CreatedAt, Desc);
}
