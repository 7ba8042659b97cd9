//! Well-known status value constants.
//!
//! These must match the `CHECK` constraints on the corresponding `status`
//! columns in the initial migration.

pub const PROJECT_DRAFT: &str = "draft";
pub const PROJECT_PUBLISHED: &str = "published";
pub const PROJECT_ARCHIVED: &str = "archived";

pub const PROJECT_STATUSES: &[&str] = &[PROJECT_DRAFT, PROJECT_PUBLISHED, PROJECT_ARCHIVED];

pub const POST_DRAFT: &str = "draft";
pub const POST_PUBLISHED: &str = "published";

pub const POST_STATUSES: &[&str] = &[POST_DRAFT, POST_PUBLISHED];

pub const CONTACT_NEW: &str = "new";
pub const CONTACT_READ: &str = "read";
pub const CONTACT_REPLIED: &str = "replied";

pub const CONTACT_STATUSES: &[&str] = &[CONTACT_NEW, CONTACT_READ, CONTACT_REPLIED];
