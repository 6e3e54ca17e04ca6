//! Shiptrack Library
//!
//! Package-tracking service: shipment records with globally unique
//! tracking codes, a fixed status timeline with progress percentages,
//! two-segment route maps, creation email notifications and fixed-layout
//! PDF receipts. Persistence, mail, geocoding and rendering sit behind
//! trait seams.

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod store;

pub use crate::core::identifier::{generate_package_id, generate_tracking_code};
pub use crate::core::lifecycle::{CreatedShipment, ShipmentChanges, ShipmentService};
pub use crate::core::notify::NotificationDispatcher;
pub use crate::core::receipt::{compose_receipt, DocElement, Document};
pub use crate::core::route::{build_route, RouteMap, RoutePoint, RouteSegment};
pub use crate::core::status::{progress, progress_for_label, status_labels, StatusProgress};
pub use models::{
    AppError, AppResult, ErrorCode, NewShipment, PackageStatus, ShipmentRecord, TrackerConfig,
    TransitMode,
};
pub use providers::geocoder::{GeocodeService, NominatimClient};
pub use providers::mailer::{HttpMailer, MailTransport, OutboundEmail};
pub use providers::renderer::{DocumentRenderer, HttpRenderer};
pub use store::{MemoryStore, ShipmentStore};
