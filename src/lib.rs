use std::sync::Arc;

use axum::http::{HeaderValue, header};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use sqlx::PgPool;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use admission::AdmissionState;
use config::Config;

pub mod admission;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}

/// Assembles the full pipeline. Execution order per request: whitelist,
/// load shedding, security headers, body cap, then (API routes only) rate
/// limiting and the wall-clock timeout; the 5xx body logger wraps everything.
pub fn build_router(state: AppState, admission: Arc<AdmissionState>) -> Router {
    let api_routes = Router::new()
        .route("/config", get(routes::config::get_config))
        .route(
            "/get-presentacion",
            get(routes::presentacion::get_presentacion),
        )
        .route(
            "/get-noticias-destacadas",
            get(routes::noticias::get_noticias_destacadas),
        )
        .route("/get-noticias", get(routes::noticias::get_noticias))
        .route("/get-noticia/{id}", get(routes::noticias::get_noticia))
        .route("/get-services", get(routes::servicios::get_services))
        .route("/get-service/{nombre}", get(routes::servicios::get_service))
        .route(
            "/get-preguntas-frecuentes",
            get(routes::preguntas::get_preguntas_frecuentes),
        )
        .route("/get-empresas", get(routes::empresas::get_empresas))
        .route(
            "/get-empresas-details",
            get(routes::empresas::get_empresas_details),
        )
        .route("/get-eventos", get(routes::eventos::get_eventos))
        .route("/query", post(routes::consulta::run_query))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_timeout,
        ))
        .layer(from_fn_with_state(
            Arc::clone(&admission),
            middleware::rate_limit,
        ));

    // Static files get the same wall-clock budget as handlers; a stalled
    // filesystem read must still produce a 408 instead of holding the socket.
    let static_files = Router::new()
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_timeout,
        ));

    let csp = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; \
         img-src 'self' data:",
    );

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(static_files)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_bytes))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(from_fn_with_state(admission, middleware::load_shed))
        .layer(from_fn(middleware::path_whitelist))
        .layer(from_fn(middleware::log_errors))
        .with_state(state)
}
