//! Notification Dispatcher
//!
//! Sends the one-and-only creation email for a shipment. Callers get a
//! plain success flag: a missing address, a transport timeout and a relay
//! rejection all collapse to `false` (each with its own log line) because
//! nothing on the request path should fail just because mail did. Updates
//! never notify.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::models::{ErrorCode, ShipmentRecord};
use crate::providers::mailer::{MailTransport, OutboundEmail};

const SUBJECT: &str = "Shipment Notification - Your Package is on the Way!";

/// Renders and dispatches creation notifications.
pub struct NotificationDispatcher {
    transport: Arc<dyn MailTransport>,
    from: String,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, from: impl Into<String>) -> Self {
        Self {
            transport,
            from: from.into(),
        }
    }

    /// Send the creation notification for a freshly persisted record.
    /// Returns `true` only when the transport accepted the message.
    pub async fn notify_created(&self, record: &ShipmentRecord) -> bool {
        let to = match record.email.as_deref() {
            Some(addr) if !addr.trim().is_empty() => addr.to_string(),
            _ => {
                warn!(
                    "No email address provided for package {}",
                    record.package_id
                );
                return false;
            }
        };

        let email = OutboundEmail {
            from: self.from.clone(),
            to,
            subject: SUBJECT.to_string(),
            text_body: render_text_body(record),
            html_body: render_html_body(record),
        };

        match self.transport.send(&email).await {
            Ok(()) => {
                info!("Email sent successfully for package {}", record.package_id);
                true
            }
            Err(e) if e.code == ErrorCode::MailTimeout => {
                error!(
                    "Connection timeout while sending email for package {}",
                    record.package_id
                );
                false
            }
            Err(e) if e.code == ErrorCode::MailTransport => {
                error!(
                    "Transport error while sending email for package {}: {}",
                    record.package_id, e
                );
                false
            }
            Err(e) => {
                error!(
                    "Unexpected error while sending email for package {}: {}",
                    record.package_id, e
                );
                false
            }
        }
    }
}

fn render_text_body(record: &ShipmentRecord) -> String {
    format!(
        "Your package is on the way!\n\n\
         Tracking code: {}\n\
         Current location: {}\n\
         Destination: {}\n\n\
         Track your shipment any time with the code above.\n",
        record.tracking_code,
        record.current_location.as_deref().unwrap_or("-"),
        record.receiving_location.as_deref().unwrap_or("-"),
    )
}

fn render_html_body(record: &ShipmentRecord) -> String {
    format!(
        "<html><body>\
         <h2>Your package is on the way!</h2>\
         <p>Tracking code: <strong>{}</strong></p>\
         <p>Current location: {}</p>\
         <p>Destination: {}</p>\
         <p>Track your shipment any time with the code above.</p>\
         </body></html>",
        record.tracking_code,
        record.current_location.as_deref().unwrap_or("-"),
        record.receiving_location.as_deref().unwrap_or("-"),
    )
}
