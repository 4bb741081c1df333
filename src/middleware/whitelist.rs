use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Top-level HTML pages served by the site.
const PAGE_PATHS: &[&str] = &[
    "/",
    "/index.html",
    "/servicios.html",
    "/noticias.html",
    "/eventos.html",
    "/empresa.html",
    "/contacto.html",
];

/// Directories static assets may be requested from.
const ASSET_DIRS: &[&str] = &["/assets/", "/css/", "/js/", "/img/"];

const ASSET_EXTENSIONS: &[&str] = &[
    ".css", ".js", ".png", ".jpg", ".jpeg", ".svg", ".ico", ".woff", ".woff2", ".webp",
];

/// Strict allow-list over request paths. Any route added to the router must
/// also be admitted here or it is unreachable.
pub fn is_allowed(path: &str) -> bool {
    if PAGE_PATHS.contains(&path) {
        return true;
    }

    // API namespace: prefix match with a non-empty remainder.
    if let Some(rest) = path.strip_prefix("/api/") {
        return !rest.is_empty();
    }

    // Assets: known extension under an allowed directory. Traversal within
    // these directories is the static file server's problem, not ours.
    if ASSET_DIRS.iter().any(|dir| path.starts_with(dir)) {
        return ASSET_EXTENSIONS.iter().any(|ext| path.ends_with(ext));
    }

    false
}

/// First gate in the pipeline: default-deny on unknown paths, before any
/// other processing spends cycles on them.
pub async fn path_whitelist(req: Request<Body>, next: Next) -> Response {
    if is_allowed(req.uri().path()) {
        next.run(req).await
    } else {
        tracing::debug!("rejected non-whitelisted path: {}", req.uri().path());
        (StatusCode::FORBIDDEN, "Forbidden").into_response()
    }
}
