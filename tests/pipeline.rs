use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use portal_backend::{
    AppState, admission::AdmissionState, build_router, config::Config, middleware,
};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        server_host: "localhost".to_string(),
        server_port: 3000,
        db_host: "localhost".to_string(),
        db_user: "portal".to_string(),
        db_password: "portal".to_string(),
        db_name: "portal".to_string(),
        db_port: 5432,
        static_dir: "public".to_string(),
        rate_limit_requests: 3,
        rate_limit_window_secs: 60,
        max_connections_per_ip: 20,
        max_request_queue: 300,
        request_timeout_secs: 1,
        max_body_bytes: 1024,
        load_shed_lag_ms: 100,
    }
}

// A lazily-connected pool never touches the network until a query runs, so
// every admission-path test works without a database.
fn test_state(config: Config) -> AppState {
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url())
        .expect("lazy pool");
    AppState { pool, config }
}

fn test_app(config: Config) -> (Router, Arc<AdmissionState>) {
    let admission = Arc::new(AdmissionState::new(&config));
    let state = test_state(config);
    (build_router(state, Arc::clone(&admission)), admission)
}

fn get_req(path: &str, ip: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header("x-real-ip", ip)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn non_whitelisted_path_is_rejected_before_the_handler() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route(
            "/api/ping",
            get({
                let hits = Arc::clone(&hits);
                move || {
                    let hits = Arc::clone(&hits);
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        "pong"
                    }
                }
            }),
        )
        .layer(from_fn(middleware::path_whitelist));

    let response = app
        .clone()
        .oneshot(get_req("/api/ping", "1.1.1.1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let response = app
        .clone()
        .oneshot(get_req("/admin/panel", "1.1.1.1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"Forbidden");
    assert_eq!(hits.load(Ordering::SeqCst), 1, "handler ran for a denied path");
}

#[tokio::test]
async fn full_router_denies_unknown_paths() {
    let (app, _) = test_app(test_config());

    for path in ["/index.php", "/etc/passwd", "/api", "/secret/style.css"] {
        let response = app.clone().oneshot(get_req(path, "2.2.2.2")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "path {}", path);
    }
}

#[tokio::test]
async fn rate_limit_rejects_the_request_after_the_ceiling() {
    let (app, _) = test_app(test_config());

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(get_req("/api/config", "9.9.9.9"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get_req("/api/config", "9.9.9.9"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers().get("x-ratelimit-limit").unwrap(), "3");
    assert_eq!(response.headers().get("x-ratelimit-remaining").unwrap(), "0");
    assert!(response.headers().contains_key("retry-after"));

    // Another client identity is unaffected.
    let response = app
        .clone()
        .oneshot(get_req("/api/config", "9.9.9.8"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn security_headers_are_set_on_api_responses() {
    let (app, _) = test_app(test_config());

    let response = app
        .clone()
        .oneshot(get_req("/api/config", "3.3.3.3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::X_FRAME_OPTIONS).unwrap(),
        "DENY"
    );
    assert!(
        response
            .headers()
            .contains_key(header::CONTENT_SECURITY_POLICY)
    );
}

#[tokio::test]
async fn overloaded_server_sheds_requests() {
    let (app, admission) = test_app(test_config());

    admission.load().record_lag(Duration::from_millis(250));
    let response = app
        .clone()
        .oneshot(get_req("/api/config", "4.4.4.4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].is_string());

    admission.load().record_lag(Duration::ZERO);
    let response = app
        .clone()
        .oneshot(get_req("/api/config", "4.4.4.4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn empty_query_is_rejected_without_touching_the_database() {
    let (app, _) = test_app(test_config());

    // The lazy pool has no live connection; if the handler issued a query
    // this would surface as a 500, not a 400.
    let request = Request::builder()
        .method("POST")
        .uri("/api/query")
        .header("x-real-ip", "5.5.5.5")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"query": "   "}"#))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Query must be a non-empty string");
}

#[tokio::test]
async fn malformed_query_payload_is_a_400() {
    let (app, _) = test_app(test_config());

    for body in [r#"{"query": 5}"#, "not json at all"] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/query")
            .header("x-real-ip", "5.5.5.6")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Query must be a non-empty string");
    }
}

#[tokio::test]
async fn oversized_bodies_are_rejected_before_the_handler() {
    let (app, _) = test_app(test_config());

    let payload = format!(r#"{{"query": "{}"}}"#, "x".repeat(4096));
    let request = Request::builder()
        .method("POST")
        .uri("/api/query")
        .header("x-real-ip", "6.6.6.6")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[cfg(unix)]
#[tokio::test]
async fn static_fallback_respects_the_request_timeout() {
    use std::process::Command;

    // A FIFO with no writer makes the file open block forever, standing in
    // for stalled filesystem reads under the static root.
    let root = std::env::temp_dir().join(format!("portal-static-{}", std::process::id()));
    let css_dir = root.join("css");
    std::fs::create_dir_all(&css_dir).unwrap();
    let fifo = css_dir.join("slow.css");
    let status = Command::new("mkfifo").arg(&fifo).status().unwrap();
    assert!(status.success(), "mkfifo failed");

    let mut config = test_config();
    config.static_dir = root.to_str().unwrap().to_string();
    let (app, _) = test_app(config);

    let response = app
        .oneshot(get_req("/css/slow.css", "8.8.8.8"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Request timed out");

    let _ = std::fs::remove_dir_all(&root);
}

#[tokio::test(start_paused = true)]
async fn timed_out_request_gets_exactly_one_408() {
    let completed = Arc::new(AtomicBool::new(false));
    let state = test_state(test_config());

    let app = Router::new()
        .route(
            "/api/slow",
            get({
                let completed = Arc::clone(&completed);
                move || {
                    let completed = Arc::clone(&completed);
                    async move {
                        tokio::time::sleep(Duration::from_millis(1500)).await;
                        completed.store(true, Ordering::SeqCst);
                        "done"
                    }
                }
            }),
        )
        .layer(from_fn_with_state(state, middleware::request_timeout));

    let response = app
        .oneshot(get_req("/api/slow", "7.7.7.7"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Request timed out");

    // The abandoned handler future was dropped with the request; give it
    // ample virtual time to prove it can never complete a second write.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(
        !completed.load(Ordering::SeqCst),
        "abandoned handler ran to completion"
    );
}
