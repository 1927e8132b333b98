//! Read-only queries against the paint catalog tables.
//!
//! The catalog is reference data loaded out of band; the API never writes to
//! it. Table and column names are kept in Portuguese to match the dataset
//! (`montadora` = brand, `ano` = year, `modelo` = model, `cor` = color).

use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `montadora` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandRow {
    pub id_montadora: i64,
    pub nome: String,
}

/// A row from the `ano` table.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct YearRow {
    pub id_ano: i64,
    pub ano: i32,
}

/// A row from the `modelo` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ModelRow {
    pub id_modelo: i64,
    pub nome: String,
    pub id_montadora: i64,
}

/// A row from the `cor` table. `codigo_cor` is the manufacturer paint code
/// and may be absent for older entries.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ColorRow {
    pub id_cor: i64,
    pub nome_cor: String,
    pub codigo_cor: Option<String>,
    pub rgb: String,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all brands, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_brands(pool: &PgPool) -> Result<Vec<BrandRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandRow>(
        "SELECT id_montadora, nome FROM montadora ORDER BY nome",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the distinct years for which a brand has catalogued colors,
/// newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_years_by_brand(pool: &PgPool, brand_id: i64) -> Result<Vec<YearRow>, DbError> {
    let rows = sqlx::query_as::<_, YearRow>(
        "SELECT DISTINCT a.id_ano, a.ano \
         FROM modelo_ano_cor mac \
         JOIN modelo m ON mac.id_modelo = m.id_modelo \
         JOIN ano a ON mac.id_ano = a.id_ano \
         WHERE m.id_montadora = $1 \
         ORDER BY a.ano DESC",
    )
    .bind(brand_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the distinct models a brand offered in a given year, by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_models_by_brand_year(
    pool: &PgPool,
    brand_id: i64,
    year_id: i64,
) -> Result<Vec<ModelRow>, DbError> {
    let rows = sqlx::query_as::<_, ModelRow>(
        "SELECT DISTINCT m.id_modelo, m.nome, m.id_montadora \
         FROM modelo_ano_cor mac \
         JOIN modelo m ON mac.id_modelo = m.id_modelo \
         WHERE m.id_montadora = $1 AND mac.id_ano = $2 \
         ORDER BY m.nome",
    )
    .bind(brand_id)
    .bind(year_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the factory colors available for a model/year pair, by color name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_colors_by_model_year(
    pool: &PgPool,
    model_id: i64,
    year_id: i64,
) -> Result<Vec<ColorRow>, DbError> {
    let rows = sqlx::query_as::<_, ColorRow>(
        "SELECT c.id_cor, c.nome_cor, c.codigo_cor, c.rgb \
         FROM modelo_ano_cor mac \
         JOIN cor c ON mac.id_cor = c.id_cor \
         WHERE mac.id_modelo = $1 AND mac.id_ano = $2 \
         ORDER BY c.nome_cor",
    )
    .bind(model_id)
    .bind(year_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
