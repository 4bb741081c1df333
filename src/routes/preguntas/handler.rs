use axum::{Json, extract::State};

use super::model::PreguntaFrecuente;
use crate::{AppState, error::AppError};

pub async fn get_preguntas_frecuentes(
    State(state): State<AppState>,
) -> Result<Json<Vec<PreguntaFrecuente>>, AppError> {
    Ok(Json(PreguntaFrecuente::list(&state.pool).await?))
}
