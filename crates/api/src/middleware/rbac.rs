//! Role-based access control (RBAC) extractors.
//!
//! A [`Policy`] names the roles allowed through; [`Access<P>`] enforces it at
//! the type level, so a route's access rule is part of its handler signature.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use folio_core::error::CoreError;
use folio_core::roles::{is_allowed, ADMIN_ROLES, STAFF_ROLES};
use folio_core::types::DbId;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An access rule for a group of routes.
pub trait Policy: Send + Sync + 'static {
    /// Roles allowed through; `None` means no authentication at all.
    const ROLES: Option<&'static [&'static str]>;
    /// 403 message for authenticated users outside [`Self::ROLES`].
    const DENIED: &'static str;
}

/// Anyone, with or without a token.
pub struct Public;

/// Admins and editors.
pub struct Staff;

/// Admins only.
pub struct AdminOnly;

impl Policy for Public {
    const ROLES: Option<&'static [&'static str]> = None;
    const DENIED: &'static str = "";
}

impl Policy for Staff {
    const ROLES: Option<&'static [&'static str]> = Some(STAFF_ROLES);
    const DENIED: &'static str = "Admin or editor role required";
}

impl Policy for AdminOnly {
    const ROLES: Option<&'static [&'static str]> = Some(ADMIN_ROLES);
    const DENIED: &'static str = "Admin role required";
}

/// Proof that the request satisfies policy `P`.
///
/// `user` is `None` only for [`Public`].
pub struct Access<P> {
    pub user: Option<AuthUser>,
    _policy: PhantomData<P>,
}

impl<P> Access<P> {
    /// Id of the acting user, if the request was authenticated.
    pub fn user_id(&self) -> Option<DbId> {
        self.user.as_ref().map(|u| u.id)
    }
}

impl<P: Policy> FromRequestParts<AppState> for Access<P> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(roles) = P::ROLES else {
            return Ok(Access {
                user: None,
                _policy: PhantomData,
            });
        };

        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_allowed(&user.role, roles) {
            tracing::debug!(user_id = user.id, role = %user.role, "Access denied");
            return Err(CoreError::Forbidden(P::DENIED.into()).into());
        }
        Ok(Access {
            user: Some(user),
            _policy: PhantomData,
        })
    }
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let access = Access::<AdminOnly>::from_request_parts(parts, state).await?;
        access
            .user
            .map(RequireAdmin)
            .ok_or_else(|| CoreError::Unauthorized("Authentication required".into()).into())
    }
}
