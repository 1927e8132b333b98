//! Road-routing distance variant backed by an OSRM server.
//!
//! Alternate to [`crate::distance::haversine`]: asks a routing service for
//! real driving distance and duration. The discovery pipeline does not call
//! this; it exists as a substitutable upgrade path.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::distance::DistanceEstimate;
use crate::error::GeoError;

const DEFAULT_BASE_URL: &str = "http://router.project-osrm.org/";

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Metres.
    distance: f64,
    /// Seconds.
    duration: f64,
}

/// Client for the OSRM `route/v1/driving` endpoint.
pub struct OsrmClient {
    client: Client,
    base_url: Url,
}

impl OsrmClient {
    /// Creates a client pointed at the public OSRM demo server.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, GeoError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`GeoError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeoError::InvalidBaseUrl {
            base_url: normalised.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches a driving route estimate between two coordinate pairs.
    ///
    /// Returns `None` when OSRM answers with a non-`Ok` code or no routes —
    /// the caller decides whether to fall back to haversine.
    ///
    /// # Errors
    ///
    /// - [`GeoError::Http`] on network failure.
    /// - [`GeoError::UnexpectedStatus`] on a non-2xx response.
    /// - [`GeoError::Deserialize`] if the body is not the expected shape.
    pub async fn route_estimate(
        &self,
        origin_lat: f64,
        origin_lng: f64,
        dest_lat: f64,
        dest_lng: f64,
    ) -> Result<Option<DistanceEstimate>, GeoError> {
        // OSRM takes lng,lat pairs.
        let path = format!(
            "route/v1/driving/{origin_lng},{origin_lat};{dest_lng},{dest_lat}?overview=false"
        );
        let url = self
            .base_url
            .join(&path)
            .map_err(|e| GeoError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: OsrmResponse =
            serde_json::from_str(&body).map_err(|e| GeoError::Deserialize {
                context: "OSRM route response".to_owned(),
                source: e,
            })?;

        if parsed.code != "Ok" {
            return Ok(None);
        }

        Ok(parsed.routes.first().map(|route| DistanceEstimate {
            distance_km: round1(route.distance / 1000.0),
            time_min: round1(route.duration / 60.0),
        }))
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
