//! Shipment Record Store
//!
//! Narrow persistence seam. The store enforces the two uniqueness
//! invariants (`tracking_code`, `package_id`); callers treat a conflict as
//! a lost identifier race and regenerate. Records are never deleted here.

pub mod memory;

pub use memory::MemoryStore;

use crate::models::{AppResult, ShipmentRecord};

/// CRUD persistence for shipment records.
pub trait ShipmentStore: Send + Sync {
    fn find_by_tracking_code(&self, code: &str) -> Option<ShipmentRecord>;
    fn find_by_package_id(&self, id: &str) -> Option<ShipmentRecord>;
    fn exists_tracking_code(&self, code: &str) -> bool;
    fn exists_package_id(&self, id: &str) -> bool;

    /// Persist a new record. Fails with `STORE_CONFLICT` if either
    /// identifier is already taken.
    fn create(&self, record: ShipmentRecord) -> AppResult<ShipmentRecord>;

    /// Replace the mutable fields of an existing record, keyed by
    /// `package_id`. Fails with `STORE_NOT_FOUND` for an unknown id and
    /// with `STORE_CONFLICT` on an identity change.
    fn update(&self, record: ShipmentRecord) -> AppResult<ShipmentRecord>;

    /// All records, unordered. Backs the admin listing and the sitemap.
    fn list(&self) -> Vec<ShipmentRecord>;
}
