//! # HTTP Server
//!
//! Axum front end for the provisioning UI:
//!
//! - `GET  /api/defaults` - default field values (secrets only for authorized callers)
//! - `POST /api/configure-hive-tenants-roadshow` - run a provisioning request (bearer auth)
//! - `GET  /healthz` / `GET /metrics` - probes and Prometheus metrics
//! - anything else under `/api` (including wrong methods) - JSON 404
//!
//! The `/api` routes are also served behind any path prefix, e.g. `/hive-ui/api/defaults`.
//! - everything else - the static single-page UI with `index.html` fallback

mod auth;
mod handlers;
mod response;

pub use handlers::DefaultsResponse;

use crate::config::{FieldDefaults, ServerConfig};
use crate::provision::Provisioner;
use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, Request};
use axum::http::Uri;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Shared state for request handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub provisioner: Provisioner,
    pub server: Arc<ServerConfig>,
    pub defaults: Arc<FieldDefaults>,
}

impl AppState {
    pub fn new(provisioner: Provisioner, server: ServerConfig, defaults: FieldDefaults) -> Self {
        Self {
            provisioner,
            server: Arc::new(server),
            defaults: Arc::new(defaults),
        }
    }
}

/// Build the application router
///
/// API routes are matched on the path from its last `/api` segment on, so the UI keeps
/// working when it is served behind a sub-path (`/hive-ui/api/defaults`).
pub fn router(state: AppState) -> Router {
    let static_dir = state.server.static_dir.clone();
    let spa = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));
    let api = api_router(state.clone());

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/metrics", get(handlers::metrics_text))
        .fallback(move |request: Request| dispatch(api.clone(), spa.clone(), request))
        .layer(DefaultBodyLimit::max(state.server.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Routes under `/api`; anything unmatched (path or method) is a JSON 404
fn api_router(state: AppState) -> Router {
    let defaults = get(handlers::get_defaults).fallback(handlers::api_not_found);
    let configure = post(handlers::configure_roadshow)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ))
        .fallback(handlers::api_not_found);

    Router::new()
        .route("/api/defaults", defaults.clone())
        .route("/api/defaults/", defaults)
        .route("/api/configure-hive-tenants-roadshow", configure.clone())
        .route("/api/configure-hive-tenants-roadshow/", configure)
        .fallback(handlers::api_not_found)
        .with_state(state)
}

/// Send API paths (at any prefix) to the API router and everything else to the UI
async fn dispatch(api: Router, spa: ServeDir<ServeFile>, mut request: Request) -> Response {
    let rewritten = api_path(request.uri().path()).map(|path| match request.uri().query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    });

    let Some(path_and_query) = rewritten else {
        return match spa.oneshot(request).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        };
    };

    match Uri::builder().path_and_query(path_and_query).build() {
        Ok(uri) => *request.uri_mut() = uri,
        Err(e) => {
            debug!("Could not rewrite API path: {}", e);
            return handlers::api_not_found().await;
        }
    }

    match api.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

/// The part of `path` starting at its last `/api` segment
fn api_path(path: &str) -> Option<&str> {
    if path.ends_with("/api") {
        return Some(&path[path.len() - "/api".len()..]);
    }
    path.rfind("/api/").map(|start| &path[start..])
}

/// Serve the router until `shutdown` resolves
pub async fn start_server<F>(state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], state.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {addr}"))?;

    info!("hive-provisioner listening on :{}", state.server.port);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}
