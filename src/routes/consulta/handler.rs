use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::{Map, Value};

use super::model::{QueryRequest, execute_raw};
use crate::{AppState, error::AppError};

/// Legacy escape hatch: runs an arbitrary caller-supplied SQL string.
/// Preserved for compatibility with the existing frontend; a hardened
/// deployment should remove this route or allow-list statement shapes.
pub async fn run_query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<Vec<Map<String, Value>>>, AppError> {
    let Json(req) = payload.map_err(|err| {
        tracing::debug!("rejected query payload: {}", err);
        AppError::BadRequest("Query must be a non-empty string")
    })?;

    let sql = req.query.trim();
    if sql.is_empty() {
        return Err(AppError::BadRequest("Query must be a non-empty string"));
    }

    Ok(Json(execute_raw(&state.pool, sql).await?))
}
