//! Route Mapper
//!
//! Resolves the three route addresses (origin, current position,
//! destination) to coordinates and produces the two path segments the map
//! layer draws: origin→current styled as completed, current→destination
//! styled as pending. Resolution order is fixed because it determines the
//! segments.

use serde::Serialize;
use tracing::{info, warn};

use crate::models::{AppError, AppResult, ShipmentRecord};
use crate::providers::geocoder::GeocodeService;

// Marker/line styling inherited from the original map
const ORIGIN_MARKER: &str = "#4CAF50";
const CURRENT_MARKER: &str = "#FF9800";
const PENDING_START_MARKER: &str = "blue";
const DESTINATION_MARKER: &str = "red";
const COMPLETED_LINE: &str = "blue";
const PENDING_LINE: &str = "gray";
const LINE_WIDTH: u8 = 3;
const DEFAULT_ZOOM: u8 = 5;

/// A geocoded (or unresolved) route point.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePoint {
    pub label: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl RoutePoint {
    fn resolved(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

/// One drawable leg of the route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSegment {
    pub name: String,
    pub points: Vec<RoutePoint>,
    pub marker_colors: Vec<String>,
    pub line_color: String,
    pub line_width: u8,
}

/// Everything the external visualization layer needs.
#[derive(Debug, Clone, Serialize)]
pub struct RouteMap {
    pub segments: Vec<RouteSegment>,
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
}

/// Geocode the record's three locations and assemble the route map.
///
/// Unresolved addresses become `(None, None)` points and are excluded from
/// the centroid. If nothing resolves there is no centroid to compute and
/// the build fails with `GEO_NO_LOCATIONS` ("map unavailable" upstream).
pub async fn build_route(
    geocoder: &dyn GeocodeService,
    record: &ShipmentRecord,
) -> AppResult<RouteMap> {
    // Order matters: origin, current, destination.
    let labels = [
        record.sending_location.clone().unwrap_or_default(),
        record.current_location.clone().unwrap_or_default(),
        record.receiving_location.clone().unwrap_or_default(),
    ];

    let mut points = Vec::with_capacity(3);
    for label in &labels {
        let coords = match geocoder.geocode(label).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Geocoding failed for {:?}: {}", label, e);
                None
            }
        };
        points.push(RoutePoint {
            label: label.clone(),
            lat: coords.map(|(lat, _)| lat),
            lon: coords.map(|(_, lon)| lon),
        });
    }

    let resolved: Vec<&RoutePoint> = points.iter().filter(|p| p.resolved()).collect();
    if resolved.is_empty() {
        return Err(AppError::no_resolvable_locations());
    }

    let center_lat =
        resolved.iter().map(|p| p.lat.unwrap()).sum::<f64>() / resolved.len() as f64;
    let center_lon =
        resolved.iter().map(|p| p.lon.unwrap()).sum::<f64>() / resolved.len() as f64;

    info!(
        "🗺️ Route for {}: {}/3 points resolved, center ({:.4}, {:.4})",
        record.package_id,
        resolved.len(),
        center_lat,
        center_lon
    );

    let completed = RouteSegment {
        name: "Our warehouse".to_string(),
        points: vec![points[0].clone(), points[1].clone()],
        marker_colors: vec![ORIGIN_MARKER.to_string(), CURRENT_MARKER.to_string()],
        line_color: COMPLETED_LINE.to_string(),
        line_width: LINE_WIDTH,
    };
    let pending = RouteSegment {
        name: "On Route to Destination".to_string(),
        points: vec![points[1].clone(), points[2].clone()],
        marker_colors: vec![
            PENDING_START_MARKER.to_string(),
            DESTINATION_MARKER.to_string(),
        ],
        line_color: PENDING_LINE.to_string(),
        line_width: LINE_WIDTH,
    };

    Ok(RouteMap {
        segments: vec![completed, pending],
        center_lat,
        center_lon,
        zoom: DEFAULT_ZOOM,
    })
}
