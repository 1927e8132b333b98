//! Straight-line distance and travel-time estimation.

use serde::Serialize;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed constant urban speed for the travel-time estimate.
const URBAN_SPEED_KMH: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceEstimate {
    pub distance_km: f64,
    pub time_min: f64,
}

/// Great-circle distance between two coordinate pairs, with a rough
/// travel-time estimate at a constant 60 km/h.
///
/// Both fields are rounded to one decimal. At 60 km/h one kilometre takes
/// one minute, so `time_min` is numerically equal to `distance_km` — that
/// equivalence is intentional and relied on by callers.
#[must_use]
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> DistanceEstimate {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    let distance = EARTH_RADIUS_KM * c;

    let time_min = (distance / URBAN_SPEED_KMH) * 60.0;

    DistanceEstimate {
        distance_km: round1(distance),
        time_min: round1(time_min),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
