use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::routes;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "item-gateway API",
        version = "1.0.0",
        description = "A minimal CRUD API over a single key-value item table"
    ),
    paths(
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::put::put_handler,
        handlers::get::get_handler,
        handlers::delete::delete_handler,
        handlers::delete::delete_missing_key_handler
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "items", description = "Item table operations")
    )
)]
pub struct ApiDoc;

/// The document with item paths moved under the configured route prefix
pub fn openapi(prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let paths = std::mem::take(&mut doc.paths.paths);
    doc.paths.paths = paths
        .into_iter()
        .map(|(path, item)| {
            if path == routes::HEALTH {
                (path, item)
            } else {
                (format!("{}{}", prefix, path), item)
            }
        })
        .collect();
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_without_prefix_keeps_paths() {
        let doc = openapi("");
        assert!(doc.paths.paths.contains_key("/list"));
        assert!(doc.paths.paths.contains_key("/delete/{key}"));
        assert!(doc.paths.paths.contains_key("/health"));
    }

    #[test]
    fn test_openapi_with_prefix() {
        let doc = openapi("/dev/picus");
        assert!(doc.paths.paths.contains_key("/dev/picus/put"));
        assert!(doc.paths.paths.contains_key("/dev/picus/delete"));
        assert!(!doc.paths.paths.contains_key("/put"));
        assert!(!doc.paths.paths.contains_key("/dev/picus/health"));
    }
}
