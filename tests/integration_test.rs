//! Integration tests for the shipment lifecycle and tracking engine

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use shiptrack::core::route::build_route;
use shiptrack::models::{
    default_delivery_date, default_shipping_date, AppResult, NewShipment, PackageStatus,
    ShipmentRecord, TransitMode,
};
use shiptrack::providers::geocoder::GeocodeService;
use shiptrack::providers::mailer::{MailTransport, OutboundEmail};
use shiptrack::{
    compose_receipt, generate_package_id, generate_tracking_code, progress_for_label,
    DocElement, MemoryStore, NotificationDispatcher, ShipmentChanges, ShipmentService,
    ShipmentStore,
};

// ============================================
// Test doubles
// ============================================

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

struct NullGeocoder;

#[async_trait]
impl GeocodeService for NullGeocoder {
    async fn geocode(&self, _address: &str) -> AppResult<Option<(f64, f64)>> {
        Ok(None)
    }
}

fn make_service(
    store: Arc<MemoryStore>,
    transport: Arc<CountingTransport>,
) -> ShipmentService {
    let dispatcher = NotificationDispatcher::new(transport, "noreply@test");
    ShipmentService::new(store, dispatcher)
}

fn new_shipment(email: Option<&str>) -> NewShipment {
    NewShipment {
        package_name: "Vintage radio".to_string(),
        sender: Some("Alice".to_string()),
        receiver: Some("Bob".to_string()),
        tel: Some("555-0100".to_string()),
        email: email.map(String::from),
        sending_location: Some("Brooklyn, NY".to_string()),
        receiving_location: Some("Austin, TX".to_string()),
        current_location: Some("Memphis, TN".to_string()),
        current_map_url: None,
        package_description: Some("Handle with care".to_string()),
        mode_of_transit: TransitMode::Road,
        package_status: PackageStatus::ShipmentProcessed,
        delivery_update: None,
        package_weight: 3.5,
        shipping_cost: 42.0,
        package_quantity: 1,
        shipping_date: None,
        delivery_date: None,
    }
}

// ============================================
// Identifier generation
// ============================================

#[test]
fn test_tracking_code_format_and_uniqueness_check() {
    let store = MemoryStore::new();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..100 {
        let code = generate_tracking_code(&mut rng, &store).unwrap();
        assert!(code.starts_with("CE"));
        assert_eq!(code.len(), 16);
        assert!(code[2..].chars().all(|c| c.is_ascii_digit()));
        // The candidate must not exist in the store at generation time.
        assert!(!store.exists_tracking_code(&code));
    }
}

#[test]
fn test_package_id_first_attempt_is_four_digits() {
    let store = MemoryStore::new();
    let mut rng = StdRng::seed_from_u64(42);
    let id = generate_package_id(&mut rng, &store).unwrap();
    assert!(id.starts_with("EXP_"));
    assert_eq!(id["EXP_".len()..].len(), 4);
}

// ============================================
// Status engine
// ============================================

#[test]
fn test_status_engine_fixed_points() {
    let delivered = progress_for_label("Delivered").unwrap();
    assert_eq!(delivered.index, 6);
    assert!((delivered.percentage - 77.8).abs() < 0.1);

    let cancelled = progress_for_label("Cancelled").unwrap();
    assert_eq!(cancelled.index, 8);
    assert_eq!(cancelled.percentage, 100.0);

    let err = progress_for_label("bogus").unwrap_err();
    assert_eq!(err.code_str(), "STATUS_UNKNOWN");
}

// ============================================
// Receipt composition
// ============================================

#[test]
fn test_zero_weight_receipt_has_fallback_rate() {
    let record = ShipmentRecord {
        tracking_code: "CE00000000000000".to_string(),
        package_id: "EXP_0001".to_string(),
        package_name: "Feathers".to_string(),
        sender: None,
        receiver: None,
        tel: None,
        email: None,
        sending_location: None,
        receiving_location: None,
        current_location: None,
        current_map_url: None,
        package_description: None,
        mode_of_transit: TransitMode::Air,
        package_status: PackageStatus::InTransit,
        delivery_update: None,
        package_weight: 0.0,
        shipping_cost: 19.0,
        package_quantity: 1,
        shipping_date: default_shipping_date(),
        delivery_date: default_delivery_date(),
    };

    let doc = compose_receipt(&record);
    let has_fallback = doc.elements.iter().any(|e| match e {
        DocElement::Table { rows, .. } => rows.iter().any(|r| r.iter().any(|c| c == "N/A")),
        _ => false,
    });
    assert!(has_fallback, "zero weight must render an N/A rate");
}

// ============================================
// Route mapping
// ============================================

#[tokio::test]
async fn test_route_with_nothing_resolvable_is_an_error() {
    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(CountingTransport::default());
    let service = make_service(store, transport);
    let created = service.create(new_shipment(None)).await.unwrap();

    let err = build_route(&NullGeocoder, &created.record).await.unwrap_err();
    assert_eq!(err.code_str(), "GEO_NO_LOCATIONS");
}

// ============================================
// Notification semantics
// ============================================

#[tokio::test]
async fn test_empty_email_means_no_transport_call() {
    let transport = Arc::new(CountingTransport::default());
    let dispatcher = NotificationDispatcher::new(transport.clone(), "noreply@test");

    let store = Arc::new(MemoryStore::new());
    let service = ShipmentService::new(store, dispatcher);
    let created = service.create(new_shipment(Some(""))).await.unwrap();

    assert!(!created.notified);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_create_notifies_once_update_notifies_never() {
    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(CountingTransport::default());
    let service = make_service(store, transport.clone());

    let created = service
        .create(new_shipment(Some("bob@example.com")))
        .await
        .unwrap();
    assert!(created.notified);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

    // Several updates: still exactly one transport call in total.
    for status in ["In Transit", "Out for Delivery", "Delivered"] {
        let changes = ShipmentChanges {
            package_status: Some(status.to_string()),
            ..Default::default()
        };
        service.update(&created.record.package_id, changes).unwrap();
    }
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
}

// ============================================
// Store round-trip
// ============================================

#[tokio::test]
async fn test_round_trip_preserves_all_fields() {
    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(CountingTransport::default());
    let service = make_service(store.clone(), transport);

    let created = service
        .create(new_shipment(Some("bob@example.com")))
        .await
        .unwrap();

    let by_code = store
        .find_by_tracking_code(&created.record.tracking_code)
        .unwrap();
    let by_id = store.find_by_package_id(&created.record.package_id).unwrap();

    assert_eq!(by_code, created.record);
    assert_eq!(by_id, created.record);
    assert_eq!(by_code.package_name, "Vintage radio");
    assert_eq!(by_code.package_weight, 3.5);
    assert_eq!(by_code.shipping_cost, 42.0);
}

#[tokio::test]
async fn test_identity_survives_updates() {
    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(CountingTransport::default());
    let service = make_service(store.clone(), transport);

    let created = service.create(new_shipment(None)).await.unwrap();
    let changes = ShipmentChanges {
        current_location: Some("Dallas, TX".to_string()),
        delivery_update: Some("Arrived at regional hub".to_string()),
        ..Default::default()
    };
    let updated = service.update(&created.record.package_id, changes).unwrap();

    assert_eq!(updated.tracking_code, created.record.tracking_code);
    assert_eq!(updated.package_id, created.record.package_id);
    assert_eq!(updated.current_location.as_deref(), Some("Dallas, TX"));
}
