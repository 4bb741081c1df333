use axum::{Json, extract::State};

use super::model::Presentacion;
use crate::{AppState, error::AppError};

pub async fn get_presentacion(
    State(state): State<AppState>,
) -> Result<Json<Vec<Presentacion>>, AppError> {
    Ok(Json(Presentacion::list(&state.pool).await?))
}
