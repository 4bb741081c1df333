use std::sync::Arc;

use axum::extract::ConnectInfo;
use hyper::Request;
use hyper::body::Incoming;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnectionBuilder;
use portal_backend::{AppState, admission::AdmissionState, build_router, config::Config};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'portal_backend';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url())
        .await
        .expect("Failed to connect to Postgres");

    let admission = Arc::new(AdmissionState::new(&config));
    let _background = admission.start_background();

    let state = AppState {
        pool,
        config: config.clone(),
    };
    let router = build_router(state, Arc::clone(&admission));

    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(CorsLayer::permissive())
    };

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Server listening on {}", addr);

    loop {
        let (stream, remote_addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::warn!("accept failed: {}", err);
                continue;
            }
        };

        // Transport-level cap: an over-budget socket is dropped here, before
        // any HTTP parsing, with no response framed.
        let Some(guard) = admission.tracker().try_admit(remote_addr.ip()) else {
            tracing::warn!(
                "dropping connection from {}: over per-IP budget",
                remote_addr.ip()
            );
            drop(stream);
            continue;
        };

        let tower_service = router.clone();
        tokio::spawn(async move {
            // Holds the IP's connection slot until this task ends.
            let _guard = guard;
            let socket = TokioIo::new(stream);
            let hyper_service =
                hyper::service::service_fn(move |mut request: Request<Incoming>| {
                    request.extensions_mut().insert(ConnectInfo(remote_addr));
                    tower_service.clone().oneshot(request)
                });

            if let Err(err) = ConnectionBuilder::new(TokioExecutor::new())
                .serve_connection(socket, hyper_service)
                .await
            {
                tracing::debug!("connection from {} closed with error: {}", remote_addr, err);
            }
        });
    }
}
