use axum::{Json, extract::State};

use super::model::Evento;
use crate::{AppState, error::AppError};

pub async fn get_eventos(State(state): State<AppState>) -> Result<Json<Vec<Evento>>, AppError> {
    Ok(Json(Evento::list(&state.pool).await?))
}
