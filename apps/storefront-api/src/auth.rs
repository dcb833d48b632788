//! # Caller Identity
//!
//! The identity provider authenticates users before they reach this server;
//! clients forward the provider's user id in the `x-user-id` header.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  x-user-id header ──► CurrentUser    missing / malformed ──► 401        │
//! │                            │                                            │
//! │                            ▼                                            │
//! │                       AdminUser       no user row / not admin ──► 403   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use storefront_core::validation::validate_user_id;
use storefront_core::User;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the identity provider's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller's user id, taken from [`USER_ID_HEADER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::unauthorized("Missing x-user-id header"))?;

        let user_id = value
            .to_str()
            .map_err(|_| ApiError::unauthorized("Invalid x-user-id header"))?;

        validate_user_id(user_id).map_err(|e| {
            debug!(error = %e, "Rejected x-user-id");
            ApiError::unauthorized("Invalid x-user-id header")
        })?;

        Ok(CurrentUser(user_id.to_string()))
    }
}

/// `Option<CurrentUser>`: no header is `None`, a malformed one is still 401.
impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(USER_ID_HEADER) {
            return Ok(None);
        }

        <CurrentUser as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}

/// A caller whose user row has the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user_id) =
            <CurrentUser as FromRequestParts<AppState>>::from_request_parts(parts, state).await?;

        match state.db.users().get_by_id(&user_id).await? {
            Some(user) if user.is_admin() => Ok(AdminUser(user)),
            Some(_) => {
                warn!(user_id = %user_id, "Admin endpoint called by non-admin");
                Err(ApiError::forbidden("Admin role required"))
            }
            None => {
                warn!(user_id = %user_id, "Admin endpoint called by unknown user");
                Err(ApiError::forbidden("Admin role required"))
            }
        }
    }
}
