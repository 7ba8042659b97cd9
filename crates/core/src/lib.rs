//! Domain logic shared by the database and HTTP layers.
//!
//! Nothing in this crate touches the database or the network: it holds the
//! error taxonomy, listing resolution (pagination, sorting), validation rules
//! and the rate-limit counter store.

pub mod error;
pub mod pagination;
pub mod rate_limit;
pub mod roles;
pub mod slug;
pub mod sort;
pub mod status;
pub mod types;
pub mod validation;
