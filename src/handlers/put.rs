use crate::error::{ApiError, ErrorResponse};
use crate::models::{assign_new_id, item_id, Item};
use crate::routes;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};

/// POST /put handler - Store a new item
///
/// The body must be declared as JSON and hold a JSON object. The item is
/// stored under a freshly generated UUID; any `id` the caller sent is replaced.
#[utoipa::path(
    post,
    path = routes::ITEM_PUT,
    request_body(content = serde_json::Value, content_type = "application/json"),
    responses(
        (status = 200, description = "Item stored, with its assigned id", body = serde_json::Value),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 415, description = "Body not declared as JSON", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "items"
)]
pub async fn put_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    if !has_json_content_type(&headers) {
        tracing::info!("Rejected item without a JSON content type");
        return Err(ApiError::UnsupportedMediaType);
    }

    let item: Item =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    let item = assign_new_id(item);

    state.store.put(item.clone()).await.map_err(|e| {
        tracing::error!("Failed to store item: {}", e);
        ApiError::Storage(e)
    })?;

    tracing::info!("Stored item with id: {}", item_id(&item).unwrap_or_default());
    Ok((StatusCode::OK, Json(item)))
}

/// `application/json` or any `application/*+json`, parameters ignored
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}
