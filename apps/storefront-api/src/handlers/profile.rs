//! Order history for the profile page.

use axum::extract::State;
use axum::Json;
use storefront_core::OrderHistoryEntry;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/profile`
///
/// The caller's orders, newest first, each with its lines.
pub async fn order_history(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<OrderHistoryEntry>>> {
    let history = state.db.orders().history(user.id()).await?;
    Ok(Json(history))
}
