//! Domain types for store discovery.

use serde::{Deserialize, Serialize};

/// One discovery request: a vehicle color description plus the caller's
/// optional location. Immutable for the duration of the request.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryRequest {
    pub color_name: String,
    pub color_code: String,
    pub car_brand: String,
    pub car_model: String,
    pub car_year: String,
    #[serde(default)]
    pub user_cep: Option<String>,
    #[serde(default)]
    pub user_lat: Option<f64>,
    #[serde(default)]
    pub user_lng: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Physical,
    Online,
}

/// Intermediate record produced by page extraction. Mutated once (coordinates
/// and distance attached) during ranking, then projected into [`StoreResult`].
#[derive(Debug, Clone)]
pub struct StoreCandidate {
    pub name: String,
    pub url: String,
    /// Empty when no address pattern matched.
    pub address: String,
    /// Empty when no phone pattern matched.
    pub phone: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub has_product: bool,
    pub product_match: String,
    pub ships_to_cep: bool,
    pub distance_km: Option<f64>,
    pub time_min: Option<f64>,
}

/// Output-facing projection of a candidate. `distance_km`/`time_min` are
/// populated only for physical entries with a resolved user location.
#[derive(Debug, Clone, Serialize)]
pub struct StoreResult {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: StoreKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_min: Option<f64>,
    pub ships_to_cep: bool,
    pub has_product: bool,
    pub product_match: String,
}

impl StoreResult {
    /// Projects a physical candidate. `ships_to_cep` is always false for
    /// physical stores; empty address/phone become `None` on the wire.
    #[must_use]
    pub fn physical(candidate: StoreCandidate) -> Self {
        Self {
            name: candidate.name,
            url: candidate.url,
            kind: StoreKind::Physical,
            address: non_empty(candidate.address),
            phone: non_empty(candidate.phone),
            distance_km: candidate.distance_km,
            time_min: candidate.time_min,
            ships_to_cep: false,
            has_product: candidate.has_product,
            product_match: candidate.product_match,
        }
    }

    /// Projects an online candidate, carrying its extracted shipping signal.
    #[must_use]
    pub fn online(candidate: StoreCandidate) -> Self {
        Self {
            name: candidate.name,
            url: candidate.url,
            kind: StoreKind::Online,
            address: None,
            phone: None,
            distance_km: None,
            time_min: None,
            ships_to_cep: candidate.ships_to_cep,
            has_product: candidate.has_product,
            product_match: candidate.product_match,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
