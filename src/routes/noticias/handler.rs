use axum::{
    Json,
    extract::{Path, State},
};

use super::model::Noticia;
use crate::{AppState, error::AppError};

/// The landing page shows the three most recent items.
pub async fn get_noticias(State(state): State<AppState>) -> Result<Json<Vec<Noticia>>, AppError> {
    Ok(Json(Noticia::latest(&state.pool, 3).await?))
}

pub async fn get_noticias_destacadas(
    State(state): State<AppState>,
) -> Result<Json<Vec<Noticia>>, AppError> {
    Ok(Json(Noticia::destacadas(&state.pool).await?))
}

pub async fn get_noticia(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Noticia>, AppError> {
    match Noticia::find_by_id(&state.pool, id).await? {
        Some(noticia) => Ok(Json(noticia)),
        None => Err(AppError::NotFound("Noticia not found")),
    }
}
