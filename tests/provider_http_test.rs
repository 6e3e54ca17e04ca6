//! HTTP provider client tests against a local mock server

use httpmock::prelude::*;
use serde_json::json;

use shiptrack::core::receipt::compose_receipt;
use shiptrack::models::{
    default_delivery_date, default_shipping_date, PackageStatus, ShipmentRecord, TransitMode,
};
use shiptrack::{
    DocumentRenderer, GeocodeService, HttpMailer, HttpRenderer, MailTransport, NominatimClient,
    OutboundEmail,
};

fn sample_record() -> ShipmentRecord {
    ShipmentRecord {
        tracking_code: "CE12345678901234".to_string(),
        package_id: "EXP_7421".to_string(),
        package_name: "Desk lamp".to_string(),
        sender: Some("Alice".to_string()),
        receiver: Some("Bob".to_string()),
        tel: None,
        email: None,
        sending_location: Some("Brooklyn, NY".to_string()),
        receiving_location: Some("Austin, TX".to_string()),
        current_location: None,
        current_map_url: None,
        package_description: None,
        mode_of_transit: TransitMode::Road,
        package_status: PackageStatus::InTransit,
        delivery_update: None,
        package_weight: 2.0,
        shipping_cost: 30.0,
        package_quantity: 1,
        shipping_date: default_shipping_date(),
        delivery_date: default_delivery_date(),
    }
}

// ============================================
// Geocoder
// ============================================

#[tokio::test]
async fn test_geocoder_parses_first_hit() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "Brooklyn, NY")
                .query_param("format", "json");
            then.status(200).json_body(json!([
                {"lat": "40.6782", "lon": "-73.9442"},
                {"lat": "0.0", "lon": "0.0"}
            ]));
        })
        .await;

    let client = NominatimClient::new(server.url("/search"));
    let resolved = client.geocode("Brooklyn, NY").await.unwrap();

    mock.assert_async().await;
    let (lat, lon) = resolved.expect("address should resolve");
    assert!((lat - 40.6782).abs() < 1e-6);
    assert!((lon + 73.9442).abs() < 1e-6);
}

#[tokio::test]
async fn test_geocoder_empty_result_is_none_not_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(json!([]));
        })
        .await;

    let client = NominatimClient::new(server.url("/search"));
    let resolved = client.geocode("Nowhere At All").await.unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn test_geocoder_blank_address_skips_the_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(json!([]));
        })
        .await;

    let client = NominatimClient::new(server.url("/search"));
    let resolved = client.geocode("   ").await.unwrap();

    assert!(resolved.is_none());
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_geocoder_server_error_surfaces_as_geocode_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(503);
        })
        .await;

    let client = NominatimClient::new(server.url("/search"));
    let err = client.geocode("Brooklyn, NY").await.unwrap_err();
    assert_eq!(err.code_str(), "GEO_FAILED");
}

#[tokio::test]
async fn test_geocoder_rejects_non_numeric_coordinates() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(200)
                .json_body(json!([{"lat": "not-a-number", "lon": "10.0"}]));
        })
        .await;

    let client = NominatimClient::new(server.url("/search"));
    let err = client.geocode("Brooklyn, NY").await.unwrap_err();
    assert_eq!(err.code_str(), "GEO_FAILED");
}

// ============================================
// Mailer
// ============================================

fn sample_email() -> OutboundEmail {
    OutboundEmail {
        from: "noreply@chaselogix.com".to_string(),
        to: "bob@example.com".to_string(),
        subject: "Shipment Notification - Your Package is on the Way!".to_string(),
        text_body: "Your package is on the way.".to_string(),
        html_body: "<p>Your package is on the way.</p>".to_string(),
    }
}

#[tokio::test]
async fn test_mailer_posts_full_message_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/send")
                .json_body_partial(r#"{"to": "bob@example.com"}"#);
            then.status(200);
        })
        .await;

    let mailer = HttpMailer::new(server.url("/send"));
    mailer.send(&sample_email()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_mailer_relay_rejection_is_a_transport_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/send");
            then.status(500);
        })
        .await;

    let mailer = HttpMailer::new(server.url("/send"));
    let err = mailer.send(&sample_email()).await.unwrap_err();
    assert_eq!(err.code_str(), "MAIL_TRANSPORT");
}

// ============================================
// Renderer
// ============================================

#[tokio::test]
async fn test_renderer_returns_document_bytes() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/render");
            then.status(200).body("%PDF-1.4 fake body");
        })
        .await;

    let renderer = HttpRenderer::new(server.url("/render"));
    let document = compose_receipt(&sample_record());
    let bytes = renderer.render(&document).await.unwrap();

    mock.assert_async().await;
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_renderer_empty_body_is_a_render_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/render");
            then.status(200).body("");
        })
        .await;

    let renderer = HttpRenderer::new(server.url("/render"));
    let document = compose_receipt(&sample_record());
    let err = renderer.render(&document).await.unwrap_err();
    assert_eq!(err.code_str(), "RENDER_FAILED");
}

#[tokio::test]
async fn test_renderer_server_error_is_a_render_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/render");
            then.status(502);
        })
        .await;

    let renderer = HttpRenderer::new(server.url("/render"));
    let document = compose_receipt(&sample_record());
    let err = renderer.render(&document).await.unwrap_err();
    assert_eq!(err.code_str(), "RENDER_FAILED");
}
