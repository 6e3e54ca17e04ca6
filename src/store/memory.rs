//! In-Memory Shipment Store
//!
//! DashMap-backed implementation of [`ShipmentStore`] for tests and
//! single-node deployments. Records are keyed by `package_id`, with a
//! secondary index mapping `tracking_code` to `package_id`.

use dashmap::DashMap;
use tracing::{debug, info};

use super::ShipmentStore;
use crate::models::{AppError, AppResult, ShipmentRecord};

/// Thread-safe in-memory record store.
#[derive(Default)]
pub struct MemoryStore {
    /// package_id -> record
    records: DashMap<String, ShipmentRecord>,
    /// tracking_code -> package_id
    tracking_index: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ShipmentStore for MemoryStore {
    fn find_by_tracking_code(&self, code: &str) -> Option<ShipmentRecord> {
        let package_id = self.tracking_index.get(code)?.clone();
        self.records.get(&package_id).map(|r| r.clone())
    }

    fn find_by_package_id(&self, id: &str) -> Option<ShipmentRecord> {
        self.records.get(id).map(|r| r.clone())
    }

    fn exists_tracking_code(&self, code: &str) -> bool {
        self.tracking_index.contains_key(code)
    }

    fn exists_package_id(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    fn create(&self, record: ShipmentRecord) -> AppResult<ShipmentRecord> {
        // Claim the tracking code first; it is the index entry a racing
        // creator would collide on.
        match self.tracking_index.entry(record.tracking_code.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(AppError::store_conflict(format!(
                    "tracking_code {} already exists",
                    record.tracking_code
                )));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(record.package_id.clone());
            }
        }

        match self.records.entry(record.package_id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                // Roll back the tracking claim so the code stays free.
                self.tracking_index.remove(&record.tracking_code);
                Err(AppError::store_conflict(format!(
                    "package_id {} already exists",
                    record.package_id
                )))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                info!(
                    "💾 Stored shipment {} ({})",
                    record.package_id, record.tracking_code
                );
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    fn update(&self, record: ShipmentRecord) -> AppResult<ShipmentRecord> {
        let mut existing = self
            .records
            .get_mut(&record.package_id)
            .ok_or_else(|| AppError::record_not_found(record.package_id.clone()))?;

        // Identity is immutable after creation.
        if existing.tracking_code != record.tracking_code {
            return Err(AppError::store_conflict(format!(
                "tracking_code of {} cannot change",
                record.package_id
            )));
        }

        debug!("✏️ Updated shipment {}", record.package_id);
        *existing = record.clone();
        Ok(record)
    }

    fn list(&self) -> Vec<ShipmentRecord> {
        self.records.iter().map(|r| r.clone()).collect()
    }
}
