//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` in the initial
//! migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_VIEWER: &str = "viewer";

/// Every role a user row may carry.
pub const ALL_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_EDITOR, ROLE_VIEWER];

/// Roles allowed to manage site content other than users and settings.
pub const STAFF_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_EDITOR];

/// Roles allowed to perform administrative writes.
pub const ADMIN_ROLES: &[&str] = &[ROLE_ADMIN];

/// Whether `role` is one of `allowed`.
pub fn is_allowed(role: &str, allowed: &[&str]) -> bool {
    allowed.iter().any(|r| *r == role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_is_staff() {
        assert!(is_allowed(ROLE_ADMIN, STAFF_ROLES));
        assert!(is_allowed(ROLE_EDITOR, STAFF_ROLES));
        assert!(!is_allowed(ROLE_VIEWER, STAFF_ROLES));
    }

    #[test]
    fn only_admin_passes_admin_roles() {
        assert!(is_allowed(ROLE_ADMIN, ADMIN_ROLES));
        assert!(!is_allowed(ROLE_EDITOR, ADMIN_ROLES));
        assert!(!is_allowed("root", ADMIN_ROLES));
    }
}
