use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;

/// Wall-clock budget for the rest of the pipeline. On expiry the handler
/// future is dropped, so a late completion has nothing left to write to —
/// the client sees exactly one response.
pub async fn request_timeout(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let budget = state.config.request_timeout();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match tokio::time::timeout(budget, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!("request timed out after {:?}: {} {}", budget, method, path);
            (
                StatusCode::REQUEST_TIMEOUT,
                Json(json!({ "error": "Request timed out" })),
            )
                .into_response()
        }
    }
}
