//! Shipment Data Types
//!
//! `ShipmentRecord` is the single persisted entity. Identity fields
//! (`tracking_code`, `package_id`) never change after creation; everything
//! else is mutable in place.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How the package travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitMode {
    Air,
    Sea,
    Road,
}

impl TransitMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Air => "Air",
            Self::Sea => "Sea",
            Self::Road => "Road",
        }
    }
}

/// Shipment status vocabulary.
///
/// The order is a fixed contract: the detail view derives the timeline
/// position and progress percentage from the declaration order. Returned
/// and Cancelled occupy the last two slots on purpose (inherited display
/// behavior) even though they are terminal-failure states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageStatus {
    #[serde(rename = "Shipment Processed")]
    ShipmentProcessed,
    #[serde(rename = "In Transit")]
    InTransit,
    #[serde(rename = "Awaiting Customs Clearance")]
    AwaitingCustomsClearance,
    #[serde(rename = "Customs Cleared")]
    CustomsCleared,
    #[serde(rename = "At Destination Facility")]
    AtDestinationFacility,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    #[serde(rename = "Delivered")]
    Delivered,
    #[serde(rename = "Returned")]
    Returned,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl PackageStatus {
    /// All statuses in timeline order.
    pub const ALL: [PackageStatus; 9] = [
        Self::ShipmentProcessed,
        Self::InTransit,
        Self::AwaitingCustomsClearance,
        Self::CustomsCleared,
        Self::AtDestinationFacility,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Returned,
        Self::Cancelled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::ShipmentProcessed => "Shipment Processed",
            Self::InTransit => "In Transit",
            Self::AwaitingCustomsClearance => "Awaiting Customs Clearance",
            Self::CustomsCleared => "Customs Cleared",
            Self::AtDestinationFacility => "At Destination Facility",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Returned => "Returned",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// A shipment as stored. See module docs for the identity invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    /// "CE" + 14 decimal digits, globally unique.
    pub tracking_code: String,
    /// "EXP_" + 4-5 decimal digits, globally unique.
    pub package_id: String,
    pub package_name: String,
    pub sender: Option<String>,
    pub receiver: Option<String>,
    /// Receiver phone number.
    pub tel: Option<String>,
    /// Receiver email address. Empty/absent means no creation notification.
    pub email: Option<String>,
    /// Sender address & city.
    pub sending_location: Option<String>,
    /// Receiver address & city.
    pub receiving_location: Option<String>,
    /// Human-readable current position (geocoded for the route map).
    pub current_location: Option<String>,
    /// Optional map-embed URL for the admin preview. Kept separate from
    /// `current_location`, which historically did double duty.
    pub current_map_url: Option<String>,
    pub package_description: Option<String>,
    pub mode_of_transit: TransitMode,
    pub package_status: PackageStatus,
    pub delivery_update: Option<String>,
    pub package_weight: f64,
    pub shipping_cost: f64,
    pub package_quantity: u32,
    pub shipping_date: NaiveDate,
    pub delivery_date: NaiveDate,
}

/// Input for creating a shipment. Identifiers and date defaults are filled
/// in by the lifecycle service.
#[derive(Debug, Clone, Deserialize)]
pub struct NewShipment {
    pub package_name: String,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub tel: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub sending_location: Option<String>,
    #[serde(default)]
    pub receiving_location: Option<String>,
    #[serde(default)]
    pub current_location: Option<String>,
    #[serde(default)]
    pub current_map_url: Option<String>,
    #[serde(default)]
    pub package_description: Option<String>,
    pub mode_of_transit: TransitMode,
    pub package_status: PackageStatus,
    #[serde(default)]
    pub delivery_update: Option<String>,
    #[serde(default)]
    pub package_weight: f64,
    #[serde(default)]
    pub shipping_cost: f64,
    #[serde(default = "default_quantity")]
    pub package_quantity: u32,
    #[serde(default)]
    pub shipping_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
}

fn default_quantity() -> u32 {
    1
}

/// Default shipping date: today.
pub fn default_shipping_date() -> NaiveDate {
    Utc::now().date_naive()
}

/// Default delivery date: today + 2 days.
pub fn default_delivery_date() -> NaiveDate {
    Utc::now().date_naive() + Duration::days(2)
}
