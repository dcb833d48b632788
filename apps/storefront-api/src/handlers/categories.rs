//! Category list.

use axum::extract::State;
use axum::Json;
use storefront_core::Category;

use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/categories`
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.db.categories().list().await?;
    Ok(Json(categories))
}
