//! Document Rendering Client
//!
//! Sends the receipt content tree to an external rendering service and
//! gets back the finished PDF bytes. Layout decisions live in
//! `core::receipt`; this client only moves the content model across the
//! wire.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::receipt::Document;
use crate::models::config::EXTERNAL_TIMEOUT;
use crate::models::{AppError, AppResult};

/// Rendering seam used by the receipt download handler.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, document: &Document) -> AppResult<Vec<u8>>;
}

/// HTTP document renderer client.
pub struct HttpRenderer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRenderer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl DocumentRenderer for HttpRenderer {
    async fn render(&self, document: &Document) -> AppResult<Vec<u8>> {
        debug!("📄 Rendering document ({} elements)", document.elements.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(document)
            .timeout(EXTERNAL_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::render_failed(format!("Renderer request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::render_failed(format!(
                "Renderer returned HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::render_failed(format!("Renderer body unreadable: {}", e)))?;

        if bytes.is_empty() {
            return Err(AppError::render_failed("Renderer returned an empty document"));
        }

        info!("📄 Rendered document: {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
