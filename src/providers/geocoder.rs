//! Geocoding Client
//!
//! Resolves free-text addresses to coordinates through a Nominatim-style
//! search endpoint. One request per address, no batching, no caching — the
//! route mapper depends on per-address results arriving in call order.
//!
//! API: GET {base}/search?q={address}&format=json

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::models::config::EXTERNAL_TIMEOUT;
use crate::models::{AppError, AppResult};

/// Address resolution seam used by the route mapper.
#[async_trait]
pub trait GeocodeService: Send + Sync {
    /// `Ok(None)` means the service answered but found nothing; that is a
    /// degraded point, not an error.
    async fn geocode(&self, address: &str) -> AppResult<Option<(f64, f64)>>;
}

/// One search hit. Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
}

/// HTTP geocoding client.
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl GeocodeService for NominatimClient {
    async fn geocode(&self, address: &str) -> AppResult<Option<(f64, f64)>> {
        if address.trim().is_empty() {
            return Ok(None);
        }

        debug!("🔍 Geocoding {:?}", address);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", address), ("format", "json")])
            .header("User-Agent", "shiptrack-geomapper")
            .timeout(EXTERNAL_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::geocode_failed(format!("Geocoder request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::geocode_failed(format!(
                "Geocoder returned HTTP {}",
                response.status()
            )));
        }

        let hits: Vec<GeocodeHit> = response
            .json()
            .await
            .map_err(|e| AppError::geocode_failed(format!("Bad geocoder payload: {}", e)))?;

        match hits.first() {
            Some(hit) => {
                let lat = hit.lat.parse::<f64>();
                let lon = hit.lon.parse::<f64>();
                match (lat, lon) {
                    (Ok(lat), Ok(lon)) => {
                        info!("📍 {:?} -> ({:.4}, {:.4})", address, lat, lon);
                        Ok(Some((lat, lon)))
                    }
                    _ => Err(AppError::geocode_failed(format!(
                        "Non-numeric coordinates for {:?}",
                        address
                    ))),
                }
            }
            None => {
                debug!("📭 No geocoder result for {:?}", address);
                Ok(None)
            }
        }
    }
}
