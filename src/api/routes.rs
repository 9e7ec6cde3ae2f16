//! API Routes
//!
//! Configures the Axum router with all service endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_pro_handler, delete_pro_handler, get_pro_handler, list_pros_handler,
    update_pro_handler, AppState,
};
use super::internal::{
    cache_invalidate_handler, cache_stats_handler, cache_sweep_handler, health_handler,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/pros` - Cached, conditional PRO listing
/// - `POST /api/pros` - Create a PRO
/// - `GET|PUT|DELETE /api/pros/:id` - Read, update or soft-delete a PRO
/// - `GET /api/internal/cache/stats` - Cache statistics
/// - `POST /api/internal/cache/sweep` - Remove expired entries now
/// - `POST /api/internal/cache/invalidate` - Invalidate by `key` or `prefix`
/// - `GET /api/internal/health`, `GET /health` - Health check
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/pros", get(list_pros_handler).post(create_pro_handler))
        .route(
            "/api/pros/:id",
            get(get_pro_handler)
                .put(update_pro_handler)
                .delete(delete_pro_handler),
        )
        .route("/api/internal/cache/stats", get(cache_stats_handler))
        .route("/api/internal/cache/sweep", post(cache_sweep_handler))
        .route("/api/internal/cache/invalidate", post(cache_invalidate_handler))
        .route("/api/internal/health", get(health_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pros::ListingSettings;
    use crate::store::MemoryStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let state = AppState::new(Arc::new(MemoryStore::new()), ListingSettings::default());
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        for uri in ["/health", "/api/internal/health"] {
            let response = create_test_app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_listing_endpoint() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/api/pros").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("etag"));
    }

    #[tokio::test]
    async fn test_get_unknown_pro() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/pros/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sweep_requires_post() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/internal/cache/sweep")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
