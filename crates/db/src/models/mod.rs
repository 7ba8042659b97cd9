//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` record struct matching the (flattened) row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` + `Validate` update DTO (all `Option` fields) for patches
//! - A `Deserialize` filter struct read from the list query string
//! - A sort allow-list declared with `folio_core::sort_fields!`

pub mod about;
pub mod blog;
pub mod category;
pub mod client;
pub mod contact;
pub mod hero;
pub mod project;
pub mod service;
pub mod statistic;
pub mod team_member;
pub mod technology;
pub mod testimonial;
pub mod user;
