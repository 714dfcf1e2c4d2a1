use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Body of a read that found nothing
pub const ITEM_NOT_FOUND: &str = "Item not found";

/// Body of a delete invoked without its key
pub const MISSING_PATH_PARAMETERS: &str = "Bad Request: Missing path parameters";

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Every way a gateway operation can fail, mapped to a status and body in one place.
///
/// List, create and read answer with an `{"error": ...}` object. Delete answers
/// with a bare JSON string, so its failures have their own variants.
#[derive(Debug)]
pub enum ApiError {
    /// Request body was not declared as JSON
    UnsupportedMediaType,
    /// Body declared as JSON but not a JSON object
    InvalidBody(String),
    /// No item stored under the key
    ItemNotFound,
    /// Store failure on list, create or read
    Storage(StoreError),
    /// Delete invoked without a key
    MissingPathParameters,
    /// Store failure on delete
    DeleteFailed(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::UnsupportedMediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported Media Type".to_string(),
            ),
            ApiError::InvalidBody(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Bad Request: {}", msg),
            ),
            ApiError::ItemNotFound => (StatusCode::NOT_FOUND, ITEM_NOT_FOUND.to_string()),
            ApiError::Storage(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::MissingPathParameters => {
                return (StatusCode::BAD_REQUEST, Json(MISSING_PATH_PARAMETERS)).into_response();
            }
            ApiError::DeleteFailed(err) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(format!("Internal server error: {}", err)),
                )
                    .into_response();
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}
