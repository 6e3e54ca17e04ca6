//! Status Engine
//!
//! Maps a shipment status to its zero-based position in the fixed
//! vocabulary and a completion percentage for the progress bar. The
//! ordering is a literal display contract: Returned and Cancelled sit in
//! the last two slots and therefore report 88.9% and 100% even though they
//! are failure states. Do not reorder.

use serde::Serialize;

use crate::models::{AppError, AppResult, PackageStatus};

/// Timeline position of a status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusProgress {
    /// Zero-based index into the status vocabulary
    pub index: usize,
    /// `((index + 1) / 9) * 100` — a UI progress figure, not business logic
    pub percentage: f64,
}

/// Labels of the full vocabulary, in timeline order.
pub fn status_labels() -> Vec<&'static str> {
    PackageStatus::ALL.iter().map(|s| s.label()).collect()
}

/// Progress for a known status. Infallible: the type guarantees membership.
pub fn progress(status: PackageStatus) -> StatusProgress {
    let index = PackageStatus::ALL
        .iter()
        .position(|s| *s == status)
        .expect("every status is in the vocabulary");
    let percentage = ((index + 1) as f64 / PackageStatus::ALL.len() as f64) * 100.0;
    StatusProgress { index, percentage }
}

/// Progress for a raw status label. Strings outside the vocabulary fail
/// with `STATUS_UNKNOWN` instead of panicking on an index lookup.
pub fn progress_for_label(label: &str) -> AppResult<StatusProgress> {
    let status = parse_label(label)?;
    Ok(progress(status))
}

/// Parse a raw label into the typed vocabulary.
pub fn parse_label(label: &str) -> AppResult<PackageStatus> {
    PackageStatus::ALL
        .into_iter()
        .find(|s| s.label() == label)
        .ok_or_else(|| AppError::unknown_status(label))
}
