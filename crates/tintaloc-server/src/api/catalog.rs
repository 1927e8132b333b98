//! Read-only catalog routes: brands, years, models and factory colors.
//!
//! Wire field names stay in Portuguese (`id_montadora`, `nome_cor`, …) to
//! match the catalog dataset the frontend was built against.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use super::{map_db_error, ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub struct BrandItem {
    pub id_montadora: i64,
    pub nome: String,
}

#[derive(Debug, Serialize)]
pub struct YearItem {
    pub id_ano: i64,
    pub ano: i32,
}

#[derive(Debug, Serialize)]
pub struct ModelItem {
    pub id_modelo: i64,
    pub nome: String,
    pub id_montadora: i64,
}

#[derive(Debug, Serialize)]
pub struct ColorItem {
    pub id_cor: i64,
    pub nome_cor: String,
    pub codigo_cor: Option<String>,
    pub rgb: String,
}

pub(super) async fn list_brands(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<Vec<BrandItem>>, ApiError> {
    let rows = tintaloc_db::list_brands(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0, &e))?;

    let items = rows
        .into_iter()
        .map(|r| BrandItem {
            id_montadora: r.id_montadora,
            nome: r.nome,
        })
        .collect();
    Ok(Json(items))
}

pub(super) async fn list_years(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(brand_id): Path<i64>,
) -> Result<Json<Vec<YearItem>>, ApiError> {
    let rows = tintaloc_db::list_years_by_brand(&state.pool, brand_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if rows.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            "no years found for this brand",
        ));
    }

    let items = rows
        .into_iter()
        .map(|r| YearItem {
            id_ano: r.id_ano,
            ano: r.ano,
        })
        .collect();
    Ok(Json(items))
}

pub(super) async fn list_models(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((brand_id, year_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<ModelItem>>, ApiError> {
    let rows = tintaloc_db::list_models_by_brand_year(&state.pool, brand_id, year_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if rows.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            "no models found for this brand and year",
        ));
    }

    let items = rows
        .into_iter()
        .map(|r| ModelItem {
            id_modelo: r.id_modelo,
            nome: r.nome,
            id_montadora: r.id_montadora,
        })
        .collect();
    Ok(Json(items))
}

pub(super) async fn list_colors(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((model_id, year_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<ColorItem>>, ApiError> {
    let rows = tintaloc_db::list_colors_by_model_year(&state.pool, model_id, year_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if rows.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            "no colors found for this model and year",
        ));
    }

    let items = rows
        .into_iter()
        .map(|r| ColorItem {
            id_cor: r.id_cor,
            nome_cor: r.nome_cor,
            codigo_cor: r.codigo_cor,
            rgb: r.rgb,
        })
        .collect();
    Ok(Json(items))
}
