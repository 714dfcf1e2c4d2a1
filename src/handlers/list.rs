use crate::error::{ApiError, ErrorResponse};
use crate::models::Item;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /list handler - Return every stored item
///
/// One scan of the table, no pagination. Order is whatever the store yields;
/// anything the store truncates internally is not fetched.
#[utoipa::path(
    get,
    path = routes::ITEM_LIST,
    responses(
        (status = 200, description = "All stored items", body = Vec<serde_json::Value>),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<Item>>), ApiError> {
    let items = state.store.scan().await.map_err(|e| {
        tracing::error!("Failed to scan items: {}", e);
        ApiError::Storage(e)
    })?;

    tracing::info!("Listed {} items", items.len());
    Ok((StatusCode::OK, Json(items)))
}
