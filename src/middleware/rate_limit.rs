use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::admission::{AdmissionState, RateDecision};

/// Client identity for rate limiting: proxy headers first, then the socket
/// address from the accept loop.
fn client_ip(req: &Request<Body>) -> IpAddr {
    req.headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .or_else(|| {
            req.headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
                .and_then(|s| s.trim().parse().ok())
        })
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip())
        })
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Fixed-window per-IP rate limit, layered onto the API router only.
pub async fn rate_limit(
    State(admission): State<Arc<AdmissionState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = client_ip(&req);

    match admission.rate().check(ip) {
        RateDecision::Allowed { limit, remaining } => {
            let mut response = next.run(req).await;
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            response
        }
        RateDecision::Limited { limit, retry_after } => {
            tracing::warn!("rate limit exceeded for {}", ip);
            let retry_secs = retry_after.as_secs().max(1);
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": "Too many requests, slow down" })),
            )
                .into_response();
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(0u32));
            headers.insert("retry-after", HeaderValue::from(retry_secs));
            response
        }
    }
}
