//! Shiptrack API Server
//!
//! Package-tracking REST API: public lookup/detail/receipt surface plus an
//! API-key guarded admin surface for creating and updating shipments.
//!
//! Usage:
//!   cargo run --bin shiptrack_api
//!
//! Environment:
//!   PORT / SHIPTRACK_PORT      - Server port (default: 8080)
//!   SHIPTRACK_HOST             - Server host (default: 0.0.0.0)
//!   SHIPTRACK_GEOCODER_URL     - Geocoding search endpoint
//!   SHIPTRACK_MAIL_URL         - Mail relay endpoint
//!   SHIPTRACK_MAIL_FROM        - Notification from-address
//!   SHIPTRACK_RENDERER_URL     - Document renderer endpoint
//!   SHIPTRACK_ADMIN_KEY        - Admin API key (unset = open, local dev)
//!   RUST_LOG                   - Log level (default: info)

use shiptrack::api::{create_router, handlers::AppState, start_cleanup_task};
use shiptrack::{
    HttpMailer, HttpRenderer, MemoryStore, NominatimClient, NotificationDispatcher,
    ShipmentService, TrackerConfig,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .compact()
        .init();

    print_banner();

    let config = TrackerConfig::from_env();
    info!("Geocoder: {}", config.geocoder_url);
    info!("Mail relay: {}", config.mail_url);
    info!("Renderer: {}", config.renderer_url);
    if config.admin_api_key.is_none() {
        info!("⚠️ No admin API key configured - admin surface is open");
    }

    // Wire up the store, external collaborators and the lifecycle service.
    let store = Arc::new(MemoryStore::new());
    let geocoder = Arc::new(NominatimClient::new(config.geocoder_url.clone()));
    let mailer = Arc::new(HttpMailer::new(config.mail_url.clone()));
    let renderer = Arc::new(HttpRenderer::new(config.renderer_url.clone()));
    let dispatcher = NotificationDispatcher::new(mailer, config.mail_from.clone());
    let service = ShipmentService::new(store.clone(), dispatcher);

    let state = Arc::new(AppState::new(
        store.clone(),
        service,
        geocoder,
        renderer,
        config.admin_api_key.clone(),
    ));

    // Start background cleanup task for the rate limiter
    start_cleanup_task();

    let app = create_router(state);

    let addr: SocketAddr = config.listen_addr().parse()?;

    info!("🚚 Shiptrack API starting on http://{}", addr);
    info!("");
    info!("Endpoints:");
    info!("  POST /track                      - Tracking-code lookup");
    info!("  GET  /package/:package_id        - Shipment detail + route map");
    info!("  GET  /receipt/:package_id        - PDF receipt");
    info!("  GET  /legal/:page                - Informational pages");
    info!("  GET  /sitemap.xml                - Sitemap");
    info!("  POST /v1/shipments               - Create shipment (admin)");
    info!("  PUT  /v1/shipments/:package_id   - Update shipment (admin)");
    info!("  GET  /v1/shipments               - List/search shipments (admin)");
    info!("  GET  /health                     - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("");
    info!("🛑 Shutdown signal received");
    info!("   Shipments in store: {}", store.len());
    info!("🚚 Shiptrack API shutdown complete");

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ============================================
      S H I P T R A C K   A P I   v{}
      package tracking / receipts / route maps
    ============================================
    "#,
        env!("CARGO_PKG_VERSION")
    );
}
