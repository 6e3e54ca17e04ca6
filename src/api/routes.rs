//! API Route Configuration

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{self, AppState};
use super::middleware::{admin_auth_middleware, logging_middleware, rate_limit_middleware};

/// Create the API router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Admin surface (API-key guarded by middleware)
    let admin = Router::new()
        .route("/shipments", post(handlers::create_shipment))
        .route("/shipments", get(handlers::list_shipments))
        .route("/shipments/:package_id", put(handlers::update_shipment))
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats));

    // Build full router
    Router::new()
        // Public tracking surface
        .route("/track", post(handlers::track_package))
        .route("/package/:package_id", get(handlers::package_detail))
        .route("/receipt/:package_id", get(handlers::download_receipt))
        .route("/legal/:page", get(handlers::legal_page))
        .route("/sitemap.xml", get(handlers::sitemap))
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::get_stats))
        .nest("/v1", admin)
        .fallback(handlers::not_found_fallback)
        .with_state(state.clone())
        // Middleware (order matters - bottom runs first)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(rate_limit_middleware))
        .layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::core::notify::NotificationDispatcher;
    use crate::core::receipt::Document;
    use crate::core::lifecycle::ShipmentService;
    use crate::models::AppResult;
    use crate::providers::geocoder::GeocodeService;
    use crate::providers::mailer::{MailTransport, OutboundEmail};
    use crate::providers::renderer::DocumentRenderer;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    struct OkTransport;

    #[async_trait]
    impl MailTransport for OkTransport {
        async fn send(&self, _email: &OutboundEmail) -> AppResult<()> {
            Ok(())
        }
    }

    struct NullGeocoder;

    #[async_trait]
    impl GeocodeService for NullGeocoder {
        async fn geocode(&self, _address: &str) -> AppResult<Option<(f64, f64)>> {
            Ok(None)
        }
    }

    struct StubRenderer;

    #[async_trait]
    impl DocumentRenderer for StubRenderer {
        async fn render(&self, _document: &Document) -> AppResult<Vec<u8>> {
            Ok(b"%PDF-1.4 stub".to_vec())
        }
    }

    fn app(admin_key: Option<&str>) -> Router {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = NotificationDispatcher::new(Arc::new(OkTransport), "noreply@test");
        let service = ShipmentService::new(store.clone(), dispatcher);
        create_router(Arc::new(AppState::new(
            store,
            service,
            Arc::new(NullGeocoder),
            Arc::new(StubRenderer),
            admin_key.map(String::from),
        )))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_stats_at_root_and_v1() {
        let app = app(None);
        for uri in ["/health", "/stats", "/v1/health", "/v1/stats"] {
            let response = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_admin_key_comes_from_state() {
        let app = app(Some("test-admin-key"));

        // No key header: rejected before any handler runs.
        let response = app.clone().oneshot(get("/v1/shipments")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Wrong key: rejected.
        let request = Request::builder()
            .uri("/v1/shipments")
            .header("X-API-Key", "wrong")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Configured key: accepted.
        let request = Request::builder()
            .uri("/v1/shipments")
            .header("X-API-Key", "test-admin-key")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_surface_open_without_configured_key() {
        let app = app(None);
        let response = app.oneshot(get("/v1/shipments")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_public_surface_is_never_key_guarded() {
        let app = app(Some("test-admin-key"));
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
