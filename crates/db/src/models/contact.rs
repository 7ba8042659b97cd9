//! Contact form submissions.

use folio_core::types::{DbId, Timestamp};
use folio_core::validation::{validate_contact_status, Payload};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `contacts` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public submission. Status always starts as `new`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContact {
    #[validate(required, length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(required, email, length(max = 254))]
    pub email: Option<String>,
    #[validate(length(max = 200))]
    pub subject: Option<String>,
    #[validate(required, length(min = 1, max = 5000))]
    pub message: Option<String>,
}

impl Payload for CreateContact {}

/// Admin triage: only the status moves.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateContact {
    #[validate(custom(function = "validate_contact_status"))]
    pub status: Option<String>,
}

impl Payload for UpdateContact {
    const PARTIAL: bool = true;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactFilter {
    pub status: Option<String>,
    /// Free text over name, email and subject.
    pub q: Option<String>,
}

folio_core::sort_fields! {
    pub enum ContactSort {
        Name => ("name", "c.name"),
        Status => ("status", "c.status"),
        CreatedAt => ("created_at", "c.created_at"),
    }
    default = (CreatedAt, Desc);
}
