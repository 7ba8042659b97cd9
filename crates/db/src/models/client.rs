//! Client logos shown on the site.

use folio_core::pagination::blank_as_none;
use folio_core::types::{DbId, Timestamp};
use folio_core::validation::Payload;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `clients` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub industry: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    #[validate(required, length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
    #[validate(url)]
    pub website_url: Option<String>,
    #[validate(length(max = 100))]
    pub industry: Option<String>,
    pub is_active: Option<bool>,
}

impl Payload for CreateClient {}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateClient {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
    #[validate(url)]
    pub website_url: Option<String>,
    #[validate(length(max = 100))]
    pub industry: Option<String>,
    pub is_active: Option<bool>,
}

impl Payload for UpdateClient {
    const PARTIAL: bool = true;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_active: Option<bool>,
    pub industry: Option<String>,
    pub q: Option<String>,
}

folio_core::sort_fields! {
    pub enum ClientSort {
        Name => ("name", "c.name"),
        CreatedAt => ("created_at", "c.created_at"),
    }
    default = (Name, Asc);
}
