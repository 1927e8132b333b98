//! Store-discovery routes.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use tintaloc_geo::Location;
use tintaloc_scraper::{DiscoveryRequest, StoreResult};

use super::{ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct UserLocationQuery {
    cep: String,
}

/// `POST /api/automotive-search/search-stores`.
///
/// Runs the discovery pipeline and returns the merged, ranked store list as a
/// bare JSON array. Sub-stage failures never surface here; only a wholesale
/// pipeline failure maps to `internal_error`.
pub(super) async fn search_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<DiscoveryRequest>,
) -> Result<Json<Vec<StoreResult>>, ApiError> {
    let results = state
        .discovery
        .discover_stores(&request)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, color = %request.color_name, "store discovery failed");
            ApiError::new(req_id.0, "internal_error", "store search failed")
        })?;

    Ok(Json(results))
}

/// `GET /api/automotive-search/user-location?cep=`.
///
/// Resolves a CEP to a [`Location`]; unknown CEPs and lookup failures are both
/// reported as `not_found`, never as an upstream error.
pub(super) async fn user_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<UserLocationQuery>,
) -> Result<Json<Location>, ApiError> {
    match state.resolver.resolve_cep(&query.cep).await {
        Some(location) => Ok(Json(location)),
        None => Err(ApiError::new(
            req_id.0,
            "not_found",
            "CEP could not be resolved",
        )),
    }
}
