use crate::error::{ApiError, ErrorResponse};
use crate::models::Item;
use crate::routes;
use crate::state::AppState;
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// GET /get/{key} handler - Retrieve one item
///
/// Absence is 404; a failing lookup is 500 with the store's message.
#[utoipa::path(
    get,
    path = routes::ITEM_GET,
    params(
        ("key" = String, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item found", body = serde_json::Value),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    match state.store.get(&key).await {
        Ok(Some(item)) => {
            tracing::info!("Successfully retrieved item with id: {}", key);
            Ok((StatusCode::OK, Json(item)))
        }
        Ok(None) => {
            tracing::info!("Item not found with id: {}", key);
            Err(ApiError::ItemNotFound)
        }
        Err(e) => {
            tracing::error!("Failed to read item with id {}: {}", key, e);
            Err(ApiError::Storage(e))
        }
    }
}
