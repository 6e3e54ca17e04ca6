//! Identifier Generator
//!
//! Tracking codes are "CE" + 14 random decimal digits; package ids are
//! "EXP_" + 4 digits on the first attempt, widening to 5 digits once a
//! collision is seen. Candidates are checked against the store and
//! regenerated until unique, with a hard cap so a pathological store
//! cannot spin the request forever.
//!
//! The existence check is a read, not a reservation: two concurrent
//! creators can pick the same candidate, and the store's unique constraint
//! decides the winner at persist time.

use rand::Rng;
use tracing::warn;

use crate::models::{AppError, AppResult};
use crate::store::ShipmentStore;

const TRACKING_PREFIX: &str = "CE";
const TRACKING_DIGITS: usize = 14;
const PACKAGE_PREFIX: &str = "EXP_";
const PACKAGE_DIGITS_FIRST: usize = 4;
const PACKAGE_DIGITS_RETRY: usize = 5;

/// Retry cap before failing with `ID_EXHAUSTED`.
pub const MAX_ATTEMPTS: u32 = 1000;

fn random_digits<R: Rng>(rng: &mut R, count: usize) -> String {
    (0..count).map(|_| char::from(b'0' + rng.gen_range(0..10))).collect()
}

/// Generate a unique tracking code, regenerating the digit suffix on every
/// collision.
pub fn generate_tracking_code<R: Rng>(
    rng: &mut R,
    store: &dyn ShipmentStore,
) -> AppResult<String> {
    for attempt in 1..=MAX_ATTEMPTS {
        let code = format!("{}{}", TRACKING_PREFIX, random_digits(rng, TRACKING_DIGITS));
        if !store.exists_tracking_code(&code) {
            return Ok(code);
        }
        warn!("Tracking code collision on attempt {}, regenerating", attempt);
    }
    Err(AppError::identifier_exhausted("tracking code", MAX_ATTEMPTS))
}

/// Generate a unique package id. The first candidate uses 4 digits; every
/// candidate after a collision uses 5 (intentional widening to thin out
/// further collisions).
pub fn generate_package_id<R: Rng>(
    rng: &mut R,
    store: &dyn ShipmentStore,
) -> AppResult<String> {
    let mut digits = PACKAGE_DIGITS_FIRST;
    for attempt in 1..=MAX_ATTEMPTS {
        let id = format!("{}{}", PACKAGE_PREFIX, random_digits(rng, digits));
        if !store.exists_package_id(&id) {
            return Ok(id);
        }
        warn!("Package id collision on attempt {}, widening suffix", attempt);
        digits = PACKAGE_DIGITS_RETRY;
    }
    Err(AppError::identifier_exhausted("package id", MAX_ATTEMPTS))
}
