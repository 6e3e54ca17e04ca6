//! Service Configuration
//!
//! Everything comes from the environment with local-dev defaults. External
//! collaborators (geocoder, mail relay, document renderer) each get a base
//! URL and a bounded timeout so a dead upstream cannot hang a request.

use std::time::Duration;

/// Mail transport connection timeout (inherited contract: 30 seconds).
pub const MAIL_TIMEOUT: Duration = Duration::from_secs(30);

/// Geocoder and renderer have no inherited timeout; 10 seconds is the
/// conservative default.
pub const EXTERNAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime configuration for the tracker service.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Listen host (default 0.0.0.0)
    pub host: String,
    /// Listen port (PORT, then SHIPTRACK_PORT, then 8080)
    pub port: u16,
    /// Geocoding service base URL
    pub geocoder_url: String,
    /// Mail relay endpoint
    pub mail_url: String,
    /// From address stamped on notifications
    pub mail_from: String,
    /// Document renderer endpoint
    pub renderer_url: String,
    /// API key for the admin surface. None = open (local dev).
    pub admin_api_key: Option<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            geocoder_url: "https://nominatim.openstreetmap.org/search".to_string(),
            mail_url: "http://localhost:8025/send".to_string(),
            mail_from: "noreply@chasexpress.example".to_string(),
            renderer_url: "http://localhost:9090/render".to_string(),
            admin_api_key: None,
        }
    }
}

impl TrackerConfig {
    /// Build configuration from environment variables, falling back to
    /// local-dev defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .or_else(|_| std::env::var("SHIPTRACK_PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        Self {
            host: std::env::var("SHIPTRACK_HOST").unwrap_or(defaults.host),
            port,
            geocoder_url: std::env::var("SHIPTRACK_GEOCODER_URL").unwrap_or(defaults.geocoder_url),
            mail_url: std::env::var("SHIPTRACK_MAIL_URL").unwrap_or(defaults.mail_url),
            mail_from: std::env::var("SHIPTRACK_MAIL_FROM").unwrap_or(defaults.mail_from),
            renderer_url: std::env::var("SHIPTRACK_RENDERER_URL").unwrap_or(defaults.renderer_url),
            admin_api_key: std::env::var("SHIPTRACK_ADMIN_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
        }
    }

    /// Socket address string for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
