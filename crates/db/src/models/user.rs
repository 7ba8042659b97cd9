//! User accounts.

use folio_core::types::{DbId, Timestamp};
use folio_core::validation::{validate_role, Payload};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `users` table. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A user together with the stored argon2 hash, for credential checks only.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithHash {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_active: bool,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserWithHash {
    /// Drop the hash.
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
            role: self.role,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// DTO for creating a user. The handler hashes `password` before insert.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(required, email, length(max = 254))]
    pub email: Option<String>,
    #[validate(required, length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(required, length(min = 8, max = 128))]
    pub password: Option<String>,
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl Payload for CreateUser {}

/// DTO for updating a user. A present `password` resets it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateUser {
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl Payload for UpdateUser {
    const PARTIAL: bool = true;
}

/// `POST /auth/login` body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required, email)]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

impl Payload for LoginRequest {}

/// `PUT /auth/password` body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ChangePassword {
    #[validate(required, length(min = 1))]
    pub current_password: Option<String>,
    #[validate(required, length(min = 8, max = 128))]
    pub new_password: Option<String>,
}

impl Payload for ChangePassword {}

/// `GET /users` filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<String>,
    pub q: Option<String>,
}

folio_core::sort_fields! {
    pub enum UserSort {
        Name => ("name", "u.name"),
        Email => ("email", "u.email"),
        Role => ("role", "u.role"),
        CreatedAt => ("created_at", "u.created_at"),
    }
    default = (CreatedAt, Desc);
}
