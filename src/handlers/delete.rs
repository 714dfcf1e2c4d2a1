use crate::error::ApiError;
use crate::routes;
use crate::state::AppState;
use crate::store::{ItemStore, StoreError};
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// Body of a successful delete
pub const ITEM_DELETED: &str = "Item deleted successfully";

/// DELETE /delete/{key} handler - Remove one item
///
/// Answers with bare JSON strings rather than error objects.
#[utoipa::path(
    delete,
    path = routes::ITEM_DELETE,
    params(
        ("key" = String, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item deleted", body = String),
        (status = 500, description = "Store error", body = String)
    ),
    tag = "items"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<(StatusCode, Json<&'static str>), ApiError> {
    delete_item(state.store.as_ref(), Some(key)).await
}

/// DELETE /delete handler - The delete route invoked without its key
#[utoipa::path(
    delete,
    path = routes::ITEM_DELETE_MISSING_KEY,
    responses(
        (status = 400, description = "Missing path parameters", body = String)
    ),
    tag = "items"
)]
pub async fn delete_missing_key_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<&'static str>), ApiError> {
    delete_item(state.store.as_ref(), None).await
}

async fn delete_item(
    store: &dyn ItemStore,
    key: Option<String>,
) -> Result<(StatusCode, Json<&'static str>), ApiError> {
    tracing::info!(key = ?key, "Received delete request");

    let Some(key) = key else {
        tracing::error!("Missing path parameters");
        return Err(ApiError::MissingPathParameters);
    };

    match store.delete(&key).await {
        Ok(()) => {
            tracing::info!("Deleted item with id: {}", key);
            Ok((StatusCode::OK, Json(ITEM_DELETED)))
        }
        Err(StoreError::Backend(message)) => {
            tracing::error!("Store error deleting item {}: {}", key, message);
            Err(ApiError::DeleteFailed(StoreError::Backend(message)))
        }
        Err(e) => {
            tracing::error!("Unexpected error deleting item {}: {}", key, e);
            Err(ApiError::DeleteFailed(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{body_json, request, setup_test_app, FailingStore};
    use crate::store::InMemoryStore;
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_delete_endpoint_missing_key() {
        let store = Arc::new(FailingStore::backend("must not be called"));
        let app = setup_test_app(store);

        let response = app
            .oneshot(request("DELETE", "/dev/picus/delete", None, ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!("Bad Request: Missing path parameters")
        );
    }

    #[tokio::test]
    async fn test_delete_endpoint_existing_integer_key() {
        let store = Arc::new(InMemoryStore::new());
        store
            .put(json!({"id": "42", "name": "a"}).as_object().cloned().unwrap())
            .await
            .unwrap();
        let app = setup_test_app(store);

        let response = app
            .clone()
            .oneshot(request("DELETE", "/dev/picus/delete/42", None, ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!("Item deleted successfully"));

        let response = app
            .oneshot(request("GET", "/dev/picus/get/42", None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_endpoint_unknown_key_succeeds() {
        let app = setup_test_app(Arc::new(InMemoryStore::new()));

        let response = app
            .oneshot(request("DELETE", "/dev/picus/delete/nothing-here", None, ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_endpoint_store_error() {
        let app = setup_test_app(Arc::new(FailingStore::backend(
            "The conditional request failed",
        )));

        let response = app
            .oneshot(request("DELETE", "/dev/picus/delete/7", None, ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!("Internal server error: The conditional request failed")
        );
    }

    #[tokio::test]
    async fn test_delete_endpoint_other_error() {
        let app = setup_test_app(Arc::new(FailingStore::other("connection reset by peer")));

        let response = app
            .oneshot(request("DELETE", "/dev/picus/delete/7", None, ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!("Internal server error: connection reset by peer")
        );
    }
}
