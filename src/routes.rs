use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc;
use crate::handlers::{
    delete_handler, delete_missing_key_handler, get_handler, health_handler, list_handler,
    put_handler,
};
use crate::state::AppState;

// Route path constants. Item routes are relative to the configured prefix.

pub const HEALTH: &str = "/health";
pub const ITEM_LIST: &str = "/list";
pub const ITEM_PUT: &str = "/put";
pub const ITEM_GET: &str = "/get/{key}";
pub const ITEM_DELETE: &str = "/delete/{key}";
pub const ITEM_DELETE_MISSING_KEY: &str = "/delete";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Assemble the full application: item routes under `prefix`, health and docs at the root
pub fn build_router(state: AppState, prefix: &str) -> Router {
    let items = Router::new()
        .route(ITEM_LIST, get(list_handler))
        .route(ITEM_PUT, post(put_handler))
        .route(ITEM_GET, get(get_handler))
        .route(ITEM_DELETE, delete(delete_handler))
        .route(ITEM_DELETE_MISSING_KEY, delete(delete_missing_key_handler));

    // axum refuses to nest at the root
    let items = if prefix.is_empty() {
        items
    } else {
        Router::new().nest(prefix, items)
    };

    Router::new()
        .route(HEALTH, get(health_handler))
        .merge(items)
        .merge(SwaggerUi::new(SWAGGER_UI).url(OPENAPI_JSON, api_doc::openapi(prefix)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{body_json, request, FailingStore};
    use crate::store::InMemoryStore;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(prefix: &str) -> Router {
        build_router(AppState::new(Arc::new(InMemoryStore::new())), prefix)
    }

    #[tokio::test]
    async fn test_create_read_delete_scenario() {
        let app = app("/dev/picus");

        let response = app
            .clone()
            .oneshot(request("POST", "/dev/picus/put", Some("application/json"), r#"{"name": "a"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_eq!(created, json!({"id": id, "name": "a"}));

        let response = app
            .clone()
            .oneshot(request("GET", &format!("/dev/picus/get/{}", id), None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, created);

        let response = app
            .clone()
            .oneshot(request("DELETE", &format!("/dev/picus/delete/{}", id), None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!("Item deleted successfully"));

        let response = app
            .oneshot(request("GET", &format!("/dev/picus/get/{}", id), None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"error": "Item not found"}));
    }

    #[tokio::test]
    async fn test_routes_follow_prefix() {
        let app = app("/prod/items");

        let response = app
            .clone()
            .oneshot(request("GET", "/prod/items/list", None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request("GET", "/dev/picus/list", None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_routes_at_root_without_prefix() {
        let app = app("");

        let response = app
            .clone()
            .oneshot(request("GET", "/list", None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));

        let response = app
            .oneshot(request("GET", "/health", None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_is_not_prefixed() {
        let app = app("/dev/picus");

        let response = app
            .clone()
            .oneshot(request("GET", "/health", None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request("GET", "/dev/picus/health", None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_openapi_document_served_with_prefixed_paths() {
        let app = app("/dev/picus");

        let response = app
            .oneshot(request("GET", OPENAPI_JSON, None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doc = body_json(response).await;
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/dev/picus/list"));
        assert!(paths.contains_key("/dev/picus/get/{key}"));
        assert!(paths.contains_key("/health"));
    }

    #[tokio::test]
    async fn test_store_failures_share_one_translation() {
        let state = AppState::new(Arc::new(FailingStore::backend("table offline")));
        let app = build_router(state, "/dev/picus");

        for (method, uri, content_type, body) in [
            ("GET", "/dev/picus/list", None, ""),
            ("POST", "/dev/picus/put", Some("application/json"), "{}"),
            ("GET", "/dev/picus/get/abc", None, ""),
        ] {
            let response = app
                .clone()
                .oneshot(request(method, uri, content_type, body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{} {}", method, uri);
            assert_eq!(body_json(response).await, json!({"error": "table offline"}));
        }
    }
}
