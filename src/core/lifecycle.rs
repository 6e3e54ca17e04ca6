//! Shipment Lifecycle Service
//!
//! The one place that creates and mutates records. Creation assigns both
//! identifiers, applies field defaults, persists, and then dispatches
//! exactly one notification. A store conflict on persist means another
//! creator won the identifier race; we regenerate and resubmit a few times
//! before giving up. Updates touch mutable fields only and never notify.

use std::sync::Arc;
use tracing::{info, warn};

use crate::core::identifier::{generate_package_id, generate_tracking_code};
use crate::core::notify::NotificationDispatcher;
use crate::models::{
    default_delivery_date, default_shipping_date, AppError, AppResult, ErrorCode, NewShipment,
    ShipmentRecord,
};
use crate::store::ShipmentStore;

/// Resubmission cap for lost identifier races.
const MAX_PERSIST_ATTEMPTS: u32 = 3;

/// Owns record creation, mutation and lookups.
pub struct ShipmentService {
    store: Arc<dyn ShipmentStore>,
    dispatcher: NotificationDispatcher,
}

/// Outcome of a creation: the stored record plus whether the notification
/// was accepted by the transport.
#[derive(Debug, Clone)]
pub struct CreatedShipment {
    pub record: ShipmentRecord,
    pub notified: bool,
}

/// Mutable-field changes for an update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ShipmentChanges {
    pub package_name: Option<String>,
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub tel: Option<String>,
    pub email: Option<String>,
    pub sending_location: Option<String>,
    pub receiving_location: Option<String>,
    pub current_location: Option<String>,
    pub current_map_url: Option<String>,
    pub package_description: Option<String>,
    pub mode_of_transit: Option<crate::models::TransitMode>,
    /// Raw status label; validated against the fixed vocabulary.
    pub package_status: Option<String>,
    pub delivery_update: Option<String>,
    pub package_weight: Option<f64>,
    pub shipping_cost: Option<f64>,
    pub package_quantity: Option<u32>,
    pub shipping_date: Option<chrono::NaiveDate>,
    pub delivery_date: Option<chrono::NaiveDate>,
}

impl ShipmentService {
    pub fn new(store: Arc<dyn ShipmentStore>, dispatcher: NotificationDispatcher) -> Self {
        Self { store, dispatcher }
    }

    /// Create a shipment: identifiers, defaults, persist, notify once.
    pub async fn create(&self, input: NewShipment) -> AppResult<CreatedShipment> {
        if input.package_name.trim().is_empty() {
            return Err(AppError::bad_request("package_name is required"));
        }
        if input.package_weight < 0.0 || input.shipping_cost < 0.0 {
            return Err(AppError::bad_request(
                "package_weight and shipping_cost must be non-negative",
            ));
        }
        if input.package_quantity == 0 {
            return Err(AppError::bad_request("package_quantity must be positive"));
        }

        let mut last_err = None;
        for attempt in 1..=MAX_PERSIST_ATTEMPTS {
            let record = self.assemble(&input)?;
            match self.store.create(record) {
                Ok(stored) => {
                    info!(
                        "📦 Created shipment {} ({})",
                        stored.package_id, stored.tracking_code
                    );
                    // Exactly once, after the first successful persist.
                    let notified = self.dispatcher.notify_created(&stored).await;
                    return Ok(CreatedShipment {
                        record: stored,
                        notified,
                    });
                }
                Err(e) if e.code == ErrorCode::StoreConflict => {
                    // Lost the check-then-use race; fresh identifiers and
                    // resubmit.
                    warn!("Identifier race lost on attempt {}, regenerating", attempt);
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or_else(|| AppError::internal("Creation failed")))
    }

    fn assemble(&self, input: &NewShipment) -> AppResult<ShipmentRecord> {
        let mut rng = rand::thread_rng();
        let tracking_code = generate_tracking_code(&mut rng, self.store.as_ref())?;
        let package_id = generate_package_id(&mut rng, self.store.as_ref())?;

        Ok(ShipmentRecord {
            tracking_code,
            package_id,
            package_name: input.package_name.clone(),
            sender: input.sender.clone(),
            receiver: input.receiver.clone(),
            tel: input.tel.clone(),
            email: input.email.clone(),
            sending_location: input.sending_location.clone(),
            receiving_location: input.receiving_location.clone(),
            current_location: input.current_location.clone(),
            current_map_url: input.current_map_url.clone(),
            package_description: input.package_description.clone(),
            mode_of_transit: input.mode_of_transit,
            package_status: input.package_status,
            delivery_update: input.delivery_update.clone(),
            package_weight: input.package_weight,
            shipping_cost: input.shipping_cost,
            package_quantity: input.package_quantity,
            shipping_date: input.shipping_date.unwrap_or_else(default_shipping_date),
            delivery_date: input.delivery_date.unwrap_or_else(default_delivery_date),
        })
    }

    /// Apply changes to an existing record. Identity stays frozen and no
    /// notification is sent.
    pub fn update(&self, package_id: &str, changes: ShipmentChanges) -> AppResult<ShipmentRecord> {
        let mut record = self
            .store
            .find_by_package_id(package_id)
            .ok_or_else(|| AppError::record_not_found(package_id))?;

        if let Some(status) = changes.package_status.as_deref() {
            record.package_status = crate::core::status::parse_label(status)?;
        }
        if let Some(v) = changes.package_name {
            if v.trim().is_empty() {
                return Err(AppError::bad_request("package_name cannot be empty"));
            }
            record.package_name = v;
        }
        if let Some(v) = changes.package_weight {
            if v < 0.0 {
                return Err(AppError::bad_request("package_weight must be non-negative"));
            }
            record.package_weight = v;
        }
        if let Some(v) = changes.shipping_cost {
            if v < 0.0 {
                return Err(AppError::bad_request("shipping_cost must be non-negative"));
            }
            record.shipping_cost = v;
        }
        if let Some(v) = changes.package_quantity {
            if v == 0 {
                return Err(AppError::bad_request("package_quantity must be positive"));
            }
            record.package_quantity = v;
        }
        if let Some(v) = changes.sender {
            record.sender = Some(v);
        }
        if let Some(v) = changes.receiver {
            record.receiver = Some(v);
        }
        if let Some(v) = changes.tel {
            record.tel = Some(v);
        }
        if let Some(v) = changes.email {
            record.email = Some(v);
        }
        if let Some(v) = changes.sending_location {
            record.sending_location = Some(v);
        }
        if let Some(v) = changes.receiving_location {
            record.receiving_location = Some(v);
        }
        if let Some(v) = changes.current_location {
            record.current_location = Some(v);
        }
        if let Some(v) = changes.current_map_url {
            record.current_map_url = Some(v);
        }
        if let Some(v) = changes.package_description {
            record.package_description = Some(v);
        }
        if let Some(v) = changes.delivery_update {
            record.delivery_update = Some(v);
        }
        if let Some(v) = changes.mode_of_transit {
            record.mode_of_transit = v;
        }
        if let Some(v) = changes.shipping_date {
            record.shipping_date = v;
        }
        if let Some(v) = changes.delivery_date {
            record.delivery_date = v;
        }

        self.store.update(record)
    }

    pub fn find_by_tracking_code(&self, code: &str) -> AppResult<ShipmentRecord> {
        self.store
            .find_by_tracking_code(code)
            .ok_or_else(|| AppError::record_not_found(code))
    }

    pub fn find_by_package_id(&self, id: &str) -> AppResult<ShipmentRecord> {
        self.store
            .find_by_package_id(id)
            .ok_or_else(|| AppError::record_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppResult, PackageStatus, TransitMode};
    use crate::providers::mailer::{MailTransport, OutboundEmail};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct CountingTransport {
        calls: AtomicU32,
    }

    #[async_trait]
    impl MailTransport for CountingTransport {
        async fn send(&self, _email: &OutboundEmail) -> AppResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn service() -> (ShipmentService, Arc<MemoryStore>, Arc<CountingTransport>) {
        let store = Arc::new(MemoryStore::new());
        let transport = Arc::new(CountingTransport::default());
        let dispatcher = NotificationDispatcher::new(transport.clone(), "noreply@test");
        (
            ShipmentService::new(store.clone(), dispatcher),
            store,
            transport,
        )
    }

    fn input(email: Option<&str>) -> NewShipment {
        NewShipment {
            package_name: "Ceramics".to_string(),
            sender: Some("Alice".to_string()),
            receiver: Some("Bob".to_string()),
            tel: None,
            email: email.map(String::from),
            sending_location: Some("Brooklyn".to_string()),
            receiving_location: Some("Austin".to_string()),
            current_location: Some("Memphis".to_string()),
            current_map_url: None,
            package_description: None,
            mode_of_transit: TransitMode::Road,
            package_status: PackageStatus::ShipmentProcessed,
            delivery_update: None,
            package_weight: 2.0,
            shipping_cost: 25.0,
            package_quantity: 1,
            shipping_date: None,
            delivery_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_identifiers_and_defaults() {
        let (service, store, _) = service();
        let created = service.create(input(None)).await.unwrap();

        assert!(created.record.tracking_code.starts_with("CE"));
        assert_eq!(created.record.tracking_code.len(), 16);
        assert!(created.record.package_id.starts_with("EXP_"));
        assert_eq!(
            created.record.delivery_date - created.record.shipping_date,
            chrono::Duration::days(2)
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_create_notifies_exactly_once() {
        let (service, _, transport) = service();
        let created = service.create(input(Some("bob@example.com"))).await.unwrap();
        assert!(created.notified);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_never_notifies() {
        let (service, _, transport) = service();
        let created = service.create(input(Some("bob@example.com"))).await.unwrap();
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        let changes = ShipmentChanges {
            package_status: Some("Delivered".to_string()),
            ..Default::default()
        };
        let updated = service.update(&created.record.package_id, changes).unwrap();
        assert_eq!(updated.package_status, PackageStatus::Delivered);
        // Still just the creation call.
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_status() {
        let (service, _, _) = service();
        let created = service.create(input(None)).await.unwrap();
        let changes = ShipmentChanges {
            package_status: Some("Teleported".to_string()),
            ..Default::default()
        };
        let err = service.update(&created.record.package_id, changes).unwrap_err();
        assert_eq!(err.code_str(), "STATUS_UNKNOWN");
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let (service, _, _) = service();

        let mut bad = input(None);
        bad.package_name = "  ".to_string();
        assert_eq!(
            service.create(bad).await.unwrap_err().code_str(),
            "API_BAD_REQUEST"
        );

        let mut bad = input(None);
        bad.package_weight = -1.0;
        assert_eq!(
            service.create(bad).await.unwrap_err().code_str(),
            "API_BAD_REQUEST"
        );

        let mut bad = input(None);
        bad.package_quantity = 0;
        assert_eq!(
            service.create(bad).await.unwrap_err().code_str(),
            "API_BAD_REQUEST"
        );
    }

    #[tokio::test]
    async fn test_round_trip_by_both_keys() {
        let (service, _, _) = service();
        let created = service.create(input(None)).await.unwrap();

        let by_code = service
            .find_by_tracking_code(&created.record.tracking_code)
            .unwrap();
        let by_id = service.find_by_package_id(&created.record.package_id).unwrap();
        assert_eq!(by_code, created.record);
        assert_eq!(by_id, created.record);
    }
}
