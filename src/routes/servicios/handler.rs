use std::future::Future;

use axum::{
    Json,
    extract::{Path, State},
};

use super::model::{LineaProducto, Servicio, ServicioDetalle};
use crate::{AppState, error::AppError};

pub async fn get_services(State(state): State<AppState>) -> Result<Json<Vec<Servicio>>, AppError> {
    Ok(Json(Servicio::list(&state.pool).await?))
}

/// Resolves the service by name first; the product-line query only runs on a
/// hit, so an unknown name costs a single SELECT.
pub async fn get_service(
    State(state): State<AppState>,
    Path(nombre): Path<String>,
) -> Result<Json<ServicioDetalle>, AppError> {
    let service = Servicio::find_by_nombre(&state.pool, &nombre).await?;
    let detalle = detalle_for(service, |id| LineaProducto::for_servicio(&state.pool, id)).await?;
    Ok(Json(detalle))
}

/// Second half of the composite lookup, split from the handler so the
/// miss path is checkable without a database: on `None` the product-line
/// fetch must never run.
async fn detalle_for<F, Fut>(
    service: Option<Servicio>,
    fetch_lines: F,
) -> Result<ServicioDetalle, AppError>
where
    F: FnOnce(i32) -> Fut,
    Fut: Future<Output = Result<Vec<LineaProducto>, sqlx::Error>>,
{
    let Some(service) = service else {
        return Err(AppError::NotFound("Service not found"));
    };

    let product_lines = fetch_lines(service.id).await?;

    Ok(ServicioDetalle {
        service,
        product_lines,
    })
}
