//! User-location resolution from coordinates or a CEP.

use serde::{Deserialize, Serialize};

use crate::cep::CepClient;

/// Coordinates used whenever a CEP resolves but no street-level geocoder is
/// available, and as the no-input default. This is a deliberate placeholder
/// (São Paulo city centre), not a real geocode of the address — swap in a
/// geocoding provider behind [`GeoResolver`] to change it.
pub const FALLBACK_LAT: f64 = -23.5505;
pub const FALLBACK_LNG: f64 = -46.6333;
const FALLBACK_CITY: &str = "São Paulo";

/// A resolved user or store location. Request-scoped; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
}

/// Resolves a caller-supplied CEP or coordinate pair into a [`Location`].
///
/// Resolution order:
/// 1. explicit `lat`/`lng` → returned as-is, no network call;
/// 2. `cep` → ViaCEP lookup; the resolved city/state are attached to the
///    fixed fallback coordinates; unknown CEP or any lookup failure → `None`;
/// 3. neither → the fixed São Paulo default.
pub struct GeoResolver {
    cep_client: CepClient,
}

impl GeoResolver {
    #[must_use]
    pub fn new(cep_client: CepClient) -> Self {
        Self { cep_client }
    }

    /// Resolve a location from the request inputs. Lookup failures are
    /// swallowed and surface as `None`; they never propagate.
    pub async fn resolve(
        &self,
        cep: Option<&str>,
        lat: Option<f64>,
        lng: Option<f64>,
    ) -> Option<Location> {
        if let (Some(lat), Some(lng)) = (lat, lng) {
            return Some(Location {
                lat,
                lng,
                city: None,
                state: None,
                cep: None,
            });
        }

        if let Some(cep) = cep {
            return self.resolve_cep(cep).await;
        }

        Some(default_location())
    }

    /// Resolve a CEP on its own, as used by the user-location endpoint.
    pub async fn resolve_cep(&self, cep: &str) -> Option<Location> {
        match self.cep_client.lookup(cep).await {
            Ok(Some(record)) => Some(Location {
                lat: FALLBACK_LAT,
                lng: FALLBACK_LNG,
                city: record.localidade,
                state: record.uf,
                cep: Some(cep.to_owned()),
            }),
            Ok(None) => {
                tracing::warn!(cep, "CEP not found by lookup service");
                None
            }
            Err(e) => {
                tracing::warn!(cep, error = %e, "CEP lookup failed");
                None
            }
        }
    }
}

fn default_location() -> Location {
    Location {
        lat: FALLBACK_LAT,
        lng: FALLBACK_LNG,
        city: Some(FALLBACK_CITY.to_owned()),
        state: None,
        cep: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> GeoResolver {
        // Unroutable base URL: any test that actually hits the network fails
        // fast instead of leaking real requests.
        let client = CepClient::with_base_url(1, "tintaloc-test/0.1", "http://127.0.0.1:9")
            .expect("build CepClient");
        GeoResolver::new(client)
    }

    #[tokio::test]
    async fn explicit_coordinates_bypass_lookup() {
        let loc = resolver()
            .resolve(Some("01310-100"), Some(-22.9), Some(-43.2))
            .await
            .expect("location");
        assert!((loc.lat - (-22.9)).abs() < f64::EPSILON);
        assert!((loc.lng - (-43.2)).abs() < f64::EPSILON);
        assert!(loc.city.is_none());
    }

    #[tokio::test]
    async fn no_inputs_yields_default_location_without_network() {
        let loc = resolver().resolve(None, None, None).await.expect("location");
        assert!((loc.lat - FALLBACK_LAT).abs() < f64::EPSILON);
        assert!((loc.lng - FALLBACK_LNG).abs() < f64::EPSILON);
        assert_eq!(loc.city.as_deref(), Some("São Paulo"));
    }

    #[tokio::test]
    async fn lookup_failure_degrades_to_none() {
        // The unroutable endpoint makes the lookup error; resolve must swallow it.
        let loc = resolver().resolve(Some("99999-999"), None, None).await;
        assert!(loc.is_none());
    }
}
