use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::admission::AdmissionState;

/// Sheds requests while the runtime is saturated, before any parsing or
/// database work is spent on them.
pub async fn load_shed(
    State(admission): State<Arc<AdmissionState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if admission.load().is_overloaded() {
        tracing::warn!(
            "shedding request, scheduler lag {:?}",
            admission.load().current_lag()
        );
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "Server overloaded, try again later" })),
        )
            .into_response();
    }

    next.run(req).await
}
