//! # User Handlers
//!
//! The caller's own user row. Clients call `PUT /api/users/me` after sign-in
//! to mirror the identity provider's user, then read the role from
//! `GET /api/users/me` to decide which pages to show.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use storefront_core::validation::validate_email;
use storefront_core::{User, ValidationError};
use tracing::info;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Longest accepted display name.
pub const MAX_USER_NAME_LEN: usize = 100;

/// Body of `PUT /api/users/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertUserRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl UpsertUserRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;

        if let Some(name) = &self.name {
            if name.chars().count() > MAX_USER_NAME_LEN {
                return Err(ValidationError::TooLong {
                    field: "name".to_string(),
                    max: MAX_USER_NAME_LEN,
                });
            }
        }

        Ok(())
    }

    /// Display name, falling back to the local part of the email.
    fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .email
                .trim()
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// `GET /api/users/me`
pub async fn get_me(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Json<User>> {
    state
        .db
        .users()
        .get_by_id(user.id())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User", user.id()))
}

/// `PUT /api/users/me`
///
/// Creates or refreshes the caller's row. The role is never changed here.
pub async fn upsert_me(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<UpsertUserRequest>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(request) = body?;
    request.validate()?;

    let saved = state
        .db
        .users()
        .upsert(user.id(), request.email.trim(), &request.display_name())
        .await?;

    info!(user_id = %saved.id, role = ?saved.role, "User upserted");
    Ok(Json(saved))
}
