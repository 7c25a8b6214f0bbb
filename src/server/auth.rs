//! # Authentication
//!
//! Static bearer-token check for the provisioning endpoint.

use super::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::warn;

/// Reject requests without `Authorization: Bearer <ADMIN_TOKEN>`
///
/// When no admin token is configured every request is let through.
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.server.admin_token.is_none() {
        return next.run(request).await;
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if state.server.is_authorized(header) {
        next.run(request).await
    } else {
        warn!("Rejected unauthorized request to {}", request.uri().path());
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "ok": false, "error": "Unauthorized" })),
        )
            .into_response()
    }
}
