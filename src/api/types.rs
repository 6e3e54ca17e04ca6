//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::core::route::RouteMap;
use crate::models::{AppError, ShipmentRecord};

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            code: "UNAUTHORIZED".to_string(),
            message: "Invalid or missing API key".to_string(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Map an internal error into the public envelope without leaking
    /// internals: only the code category survives for 5xx failures.
    pub fn from_app_error(err: &AppError) -> Self {
        match err.code.http_status() {
            400 => Self::bad_request(err.message.clone()),
            404 => Self::not_found(err.message.clone()),
            401 => Self::unauthorized(),
            _ => Self::internal("An internal error occurred"),
        }
    }
}

// ============================================
// Tracking Lookup
// ============================================

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    #[serde(default)]
    pub tracking_code: String,
}

#[derive(Debug, Serialize)]
pub struct TrackData {
    pub package_id: String,
    /// Path of the detail view for this record
    pub detail_url: String,
}

// ============================================
// Package Detail
// ============================================

#[derive(Debug, Serialize)]
pub struct ShipmentDetailData {
    #[serde(flatten)]
    pub record: ShipmentRecord,
    /// Full status vocabulary in timeline order
    pub status_list: Vec<&'static str>,
    /// Zero-based position of the current status
    pub status_index: usize,
    /// Progress-bar percentage
    pub status_percentage: f64,
    /// Route map, or an explicit null when the map could not be built
    pub map: Option<RouteMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_error: Option<String>,
}

// ============================================
// Admin: Create / Update / List
// ============================================

#[derive(Debug, Serialize)]
pub struct CreateShipmentData {
    #[serde(flatten)]
    pub record: ShipmentRecord,
    /// Whether the creation notification was accepted by the transport
    pub notified: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListShipmentsQuery {
    /// Filter by exact status label
    #[serde(default)]
    pub status: Option<String>,
    /// Filter by transit mode label
    #[serde(default)]
    pub mode: Option<String>,
    /// Substring match on package_id, tracking_code or package_name
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListShipmentsData {
    pub total: usize,
    pub shipments: Vec<ShipmentRecord>,
}

// ============================================
// Health / Stats
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub total_shipments: usize,
    pub uptime_seconds: u64,
    pub api_version: String,
}
