//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so log lines can be grepped
//! and monitored without parsing free text.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - ID_xxx: identifier generation
//! - STATUS_xxx: status engine
//! - STORE_xxx: shipment record store
//! - MAIL_xxx: notification dispatch
//! - GEO_xxx: geocoding / route mapping
//! - RENDER_xxx: document rendering
//! - API_xxx: HTTP surface
//! - CFG_xxx: configuration

use std::fmt;

/// Application-wide error type. All fallible paths flow through this.
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Identifier Generation
    // ============================================
    /// Retry cap exceeded while searching for a unique identifier
    IdentifierExhausted,

    // ============================================
    // Status Engine
    // ============================================
    /// Status string outside the fixed vocabulary
    UnknownStatus,

    // ============================================
    // Record Store
    // ============================================
    /// No record with the given key
    RecordNotFound,
    /// Unique constraint (tracking_code / package_id) violated
    StoreConflict,

    // ============================================
    // Notification Dispatch
    // ============================================
    /// Mail transport timed out
    MailTimeout,
    /// Mail transport rejected the message
    MailTransport,
    /// Any other notification failure
    MailFailed,

    // ============================================
    // Geocoding / Route Mapping
    // ============================================
    /// Geocoding request failed
    GeocodeFailed,
    /// All route points failed to geocode
    NoResolvableLocations,

    // ============================================
    // Document Rendering
    // ============================================
    /// Renderer returned an error or unusable output
    RenderFailed,

    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Unauthorized (invalid API key)
    ApiUnauthorized,
    /// Resource not found
    ApiNotFound,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Missing environment variable
    ConfigMissingEnv,
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Generic
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IdentifierExhausted => "ID_EXHAUSTED",

            Self::UnknownStatus => "STATUS_UNKNOWN",

            Self::RecordNotFound => "STORE_NOT_FOUND",
            Self::StoreConflict => "STORE_CONFLICT",

            Self::MailTimeout => "MAIL_TIMEOUT",
            Self::MailTransport => "MAIL_TRANSPORT",
            Self::MailFailed => "MAIL_FAILED",

            Self::GeocodeFailed => "GEO_FAILED",
            Self::NoResolvableLocations => "GEO_NO_LOCATIONS",

            Self::RenderFailed => "RENDER_FAILED",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiUnauthorized => "API_UNAUTHORIZED",
            Self::ApiNotFound => "API_NOT_FOUND",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            Self::ConfigMissingEnv => "CFG_MISSING_ENV",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest | Self::UnknownStatus | Self::ConfigInvalidValue => 400,
            Self::ApiUnauthorized => 401,
            Self::ApiNotFound | Self::RecordNotFound => 404,
            Self::StoreConflict => 409,
            _ => 500,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::MailTimeout | Self::GeocodeFailed | Self::StoreConflict
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Identifier retry cap exceeded
    pub fn identifier_exhausted(kind: &str, attempts: u32) -> Self {
        Self::new(
            ErrorCode::IdentifierExhausted,
            format!("Gave up generating a unique {} after {} attempts", kind, attempts),
        )
    }

    /// Status string outside the fixed vocabulary
    pub fn unknown_status(label: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UnknownStatus,
            format!("Unknown package status: {:?}", label.into()),
        )
    }

    /// Record not found
    pub fn record_not_found(key: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::RecordNotFound,
            format!("No shipment record for {}", key.into()),
        )
    }

    /// Unique constraint violated
    pub fn store_conflict(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreConflict, msg)
    }

    /// Mail transport timed out
    pub fn mail_timeout(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::MailTimeout, msg)
    }

    /// Mail transport rejected the message
    pub fn mail_transport(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::MailTransport, msg)
    }

    /// Geocoding failed
    pub fn geocode_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::GeocodeFailed, msg)
    }

    /// All route points failed to geocode
    pub fn no_resolvable_locations() -> Self {
        Self::new(
            ErrorCode::NoResolvableLocations,
            "None of the route locations could be geocoded",
        )
    }

    /// Renderer failure
    pub fn render_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RenderFailed, msg)
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::GeocodeFailed, "Request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::GeocodeFailed, "Connection failed")
        } else {
            Self::new(ErrorCode::Unknown, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::ApiBadRequest, "JSON parse error", err)
    }
}
