use axum::{Json, extract::State};

use super::model::{EmpresaDetalle, EmpresaNombre};
use crate::{AppState, error::AppError};

pub async fn get_empresas(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmpresaNombre>>, AppError> {
    Ok(Json(EmpresaNombre::list(&state.pool).await?))
}

pub async fn get_empresas_details(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmpresaDetalle>>, AppError> {
    Ok(Json(EmpresaDetalle::list(&state.pool).await?))
}
