//! Mail Transport Client
//!
//! Hands finished messages (plain text + HTML body) to an external mail
//! relay over HTTP with a bounded 30-second timeout. The transport does
//! not retry; the notification dispatcher decides what a failure means.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::models::config::MAIL_TIMEOUT;
use crate::models::{AppError, AppResult};

/// A fully rendered outbound message.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Mail delivery seam used by the notification dispatcher.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> AppResult<()>;
}

/// HTTP mail relay client.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMailer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl MailTransport for HttpMailer {
    async fn send(&self, email: &OutboundEmail) -> AppResult<()> {
        debug!("✉️ Handing message for {} to relay", email.to);

        let response = self
            .client
            .post(&self.endpoint)
            .json(email)
            .timeout(MAIL_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::mail_timeout("Mail relay connection timed out")
                } else {
                    AppError::mail_transport(format!("Mail relay request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(AppError::mail_transport(format!(
                "Mail relay returned HTTP {}",
                response.status()
            )));
        }

        info!("✉️ Message for {} accepted by relay", email.to);
        Ok(())
    }
}
