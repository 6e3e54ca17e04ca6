//! API Request Handlers
//!
//! Stateless translation layer between HTTP and the lifecycle service.
//! Lookup and detail handlers catch everything and degrade to a
//! user-visible message; internal detail only ever reaches the logs.

use axum::{
    extract::{Json, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use super::types::*;
use crate::core::lifecycle::{CreatedShipment, ShipmentChanges, ShipmentService};
use crate::core::receipt::compose_receipt;
use crate::core::route::build_route;
use crate::core::status;
use crate::models::{ErrorCode, NewShipment, ShipmentRecord};
use crate::providers::geocoder::GeocodeService;
use crate::providers::renderer::DocumentRenderer;
use crate::store::ShipmentStore;

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn ShipmentStore>,
    pub service: ShipmentService,
    pub geocoder: Arc<dyn GeocodeService>,
    pub renderer: Arc<dyn DocumentRenderer>,
    /// Key guarding the `/v1/shipments` surface. None = open (local dev).
    pub admin_api_key: Option<String>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ShipmentStore>,
        service: ShipmentService,
        geocoder: Arc<dyn GeocodeService>,
        renderer: Arc<dyn DocumentRenderer>,
        admin_api_key: Option<String>,
    ) -> Self {
        Self {
            store,
            service,
            geocoder,
            renderer,
            admin_api_key,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

fn fail(status: StatusCode, error: ApiError, start: Instant) -> HandlerError {
    (
        status,
        Json(ApiResponse::error(error, elapsed_ms(start))),
    )
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// ============================================
// Health & Stats
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();

    let data = StatsData {
        total_shipments: state.store.list().len(),
        uptime_seconds: state.uptime_seconds(),
        api_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Tracking Lookup
// ============================================

/// Tracking-code lookup. Mirrors the classic front-page form: empty input
/// and unknown codes each get their own friendly message.
pub async fn track_package(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TrackRequest>,
) -> Result<Json<ApiResponse<TrackData>>, HandlerError> {
    let start = Instant::now();

    let code = req.tracking_code.trim();
    if code.is_empty() {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            ApiError::bad_request("Please enter a tracking code."),
            start,
        ));
    }

    match state.store.find_by_tracking_code(code) {
        Some(record) => {
            info!("🔍 Tracking lookup hit: {} -> {}", code, record.package_id);
            let data = TrackData {
                detail_url: format!("/package/{}", record.package_id),
                package_id: record.package_id,
            };
            Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
        }
        None => Err(fail(
            StatusCode::NOT_FOUND,
            ApiError::not_found("Package with this tracking code does not exist."),
            start,
        )),
    }
}

// ============================================
// Package Detail
// ============================================

/// Detail view: record fields plus timeline position and route map. A map
/// failure degrades to `map: null`; it never takes the whole view down.
pub async fn package_detail(
    State(state): State<Arc<AppState>>,
    Path(package_id): Path<String>,
) -> Result<Json<ApiResponse<ShipmentDetailData>>, HandlerError> {
    let start = Instant::now();

    let record = state.store.find_by_package_id(&package_id).ok_or_else(|| {
        fail(
            StatusCode::NOT_FOUND,
            ApiError::not_found(format!("Package {} does not exist.", package_id)),
            start,
        )
    })?;

    let progress = status::progress(record.package_status);

    let (map, map_error) = match build_route(state.geocoder.as_ref(), &record).await {
        Ok(map) => (Some(map), None),
        Err(e) => {
            warn!("Map build failed for {}: {}", package_id, e);
            (None, Some("map unavailable".to_string()))
        }
    };

    let data = ShipmentDetailData {
        status_list: status::status_labels(),
        status_index: progress.index,
        status_percentage: progress.percentage,
        map,
        map_error,
        record,
    };

    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}

// ============================================
// Receipt Download
// ============================================

/// Compose the receipt and stream the rendered PDF inline.
pub async fn download_receipt(
    State(state): State<Arc<AppState>>,
    Path(package_id): Path<String>,
) -> Result<Response, HandlerError> {
    let start = Instant::now();

    let record = state.store.find_by_package_id(&package_id).ok_or_else(|| {
        fail(
            StatusCode::NOT_FOUND,
            ApiError::not_found(format!("Package {} does not exist.", package_id)),
            start,
        )
    })?;

    let document = compose_receipt(&record);

    let bytes = state.renderer.render(&document).await.map_err(|e| {
        error!("Receipt rendering failed for {}: {}", package_id, e);
        fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::internal("Could not generate the receipt."),
            start,
        )
    })?;

    info!("🧾 Receipt for {}: {} bytes", package_id, bytes.len());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"package_receipt_{}.pdf\"", package_id),
            ),
        ],
        bytes,
    )
        .into_response())
}

// ============================================
// Admin: Create / Update / List
// ============================================

pub async fn create_shipment(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewShipment>,
) -> Result<(StatusCode, Json<ApiResponse<CreateShipmentData>>), HandlerError> {
    let start = Instant::now();

    match state.service.create(input).await {
        Ok(CreatedShipment { record, notified }) => {
            let data = CreateShipmentData { record, notified };
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(data, elapsed_ms(start))),
            ))
        }
        Err(e) => {
            if e.code == ErrorCode::IdentifierExhausted {
                error!("Identifier space exhausted: {}", e);
            }
            Err(fail(
                StatusCode::from_u16(e.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                ApiError::from_app_error(&e),
                start,
            ))
        }
    }
}

pub async fn update_shipment(
    State(state): State<Arc<AppState>>,
    Path(package_id): Path<String>,
    Json(changes): Json<ShipmentChanges>,
) -> Result<Json<ApiResponse<ShipmentRecord>>, HandlerError> {
    let start = Instant::now();

    match state.service.update(&package_id, changes) {
        Ok(record) => Ok(Json(ApiResponse::success(record, elapsed_ms(start)))),
        Err(e) => Err(fail(
            StatusCode::from_u16(e.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::from_app_error(&e),
            start,
        )),
    }
}

pub async fn list_shipments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListShipmentsQuery>,
) -> Json<ApiResponse<ListShipmentsData>> {
    let start = Instant::now();

    let needle = query.q.as_deref().map(str::to_lowercase);
    let shipments: Vec<ShipmentRecord> = state
        .store
        .list()
        .into_iter()
        .filter(|r| {
            query
                .status
                .as_deref()
                .map_or(true, |s| r.package_status.label() == s)
        })
        .filter(|r| {
            query
                .mode
                .as_deref()
                .map_or(true, |m| r.mode_of_transit.label() == m)
        })
        .filter(|r| {
            needle.as_deref().map_or(true, |q| {
                r.package_id.to_lowercase().contains(q)
                    || r.tracking_code.to_lowercase().contains(q)
                    || r.package_name.to_lowercase().contains(q)
            })
        })
        .collect();

    let data = ListShipmentsData {
        total: shipments.len(),
        shipments,
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Static Pages & Sitemap
// ============================================

const LEGAL_PAGES: [(&str, &str, &str); 5] = [
    (
        "privacy-policy",
        "Privacy Policy",
        "We only store the shipment details you give us and use them to deliver your package and notify you about it.",
    ),
    (
        "terms-of-service",
        "Terms of Service",
        "By using this service you agree that tracking information is provided as-is and may lag behind the physical shipment.",
    ),
    (
        "cookies-policy",
        "Cookies Policy",
        "This site uses only the cookies strictly required to operate; nothing is shared with third parties.",
    ),
    (
        "shipping-policy",
        "Shipping Policy",
        "Shipments are dispatched by air, sea or road. Estimated delivery is two days after the shipping date unless noted otherwise.",
    ),
    (
        "returns-policy",
        "Returns Policy",
        "Refused or undeliverable packages are returned to the sender at the original service level.",
    ),
];

pub async fn legal_page(Path(page): Path<String>) -> Result<Html<String>, HandlerError> {
    let start = Instant::now();

    LEGAL_PAGES
        .iter()
        .find(|(slug, _, _)| *slug == page)
        .map(|(_, title, body)| {
            Html(format!(
                "<html><head><title>{title} - CHASEXPRESS</title></head>\
                 <body><h1>{title}</h1><p>{body}</p></body></html>"
            ))
        })
        .ok_or_else(|| {
            fail(
                StatusCode::NOT_FOUND,
                ApiError::not_found("Page not found"),
                start,
            )
        })
}

/// Package detail URLs plus the static entries, daily/weekly change
/// frequency as inherited.
pub async fn sitemap(State(state): State<Arc<AppState>>) -> Response {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    xml.push_str("  <url><loc>/</loc><changefreq>weekly</changefreq><priority>0.5</priority></url>\n");
    for (slug, _, _) in LEGAL_PAGES {
        xml.push_str(&format!(
            "  <url><loc>/legal/{slug}</loc><changefreq>weekly</changefreq><priority>0.5</priority></url>\n"
        ));
    }
    for record in state.store.list() {
        xml.push_str(&format!(
            "  <url><loc>/package/{}</loc><changefreq>daily</changefreq><priority>0.8</priority></url>\n",
            record.package_id
        ));
    }
    xml.push_str("</urlset>\n");

    ([(header::CONTENT_TYPE, "application/xml")], xml).into_response()
}

// ============================================
// Fallbacks
// ============================================

pub async fn not_found_fallback() -> HandlerError {
    fail(
        StatusCode::NOT_FOUND,
        ApiError::not_found("The page you are looking for does not exist."),
        Instant::now(),
    )
}
