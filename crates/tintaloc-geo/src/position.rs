//! Store-position estimation.
//!
//! Candidate pages almost never expose machine-readable coordinates, and no
//! geocoding provider is wired in, so physical-store coordinates have to be
//! estimated. The strategy sits behind a trait so a real geocoder can be
//! substituted without touching the discovery pipeline.

use rand::Rng;

use crate::resolver::Location;

/// Strategy for estimating a store's coordinates relative to the user.
pub trait PositionEstimate: Send + Sync {
    /// Returns an estimated `(lat, lng)` for a store near `user`.
    fn estimate(&self, user: &Location) -> (f64, f64);
}

/// Uniformly jitters the user's own coordinates by up to `max_offset_deg`
/// in each axis. A stand-in for real store geocoding, which is unavailable.
#[derive(Debug, Clone, Copy)]
pub struct JitterEstimator {
    pub max_offset_deg: f64,
}

impl Default for JitterEstimator {
    fn default() -> Self {
        Self {
            max_offset_deg: 0.05,
        }
    }
}

impl PositionEstimate for JitterEstimator {
    fn estimate(&self, user: &Location) -> (f64, f64) {
        let mut rng = rand::rng();
        let d = self.max_offset_deg;
        (
            user.lat + rng.random_range(-d..=d),
            user.lng + rng.random_range(-d..=d),
        )
    }
}
