//! # Request Handlers

use super::response::error_response;
use super::AppState;
use crate::config::DefaultValues;
use crate::observability::metrics;
use crate::provision::{ProvisionError, ProvisionOutcome, ProvisioningRequest};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

const NOTE_PREFILL_NEEDS_AUTH: &str =
    "Secrets are enabled but require ADMIN_TOKEN auth to be returned";
const NOTE_PREFILL_DISABLED: &str =
    "Secrets are not enabled (set PREFILL_SECRETS=true and ADMIN_TOKEN to allow)";

/// Body of `GET /api/defaults`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultsResponse {
    pub ok: bool,
    pub include_secrets: bool,
    pub defaults: DefaultValues,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

pub async fn get_defaults(State(state): State<AppState>, headers: HeaderMap) -> Json<DefaultsResponse> {
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let prefill = state.server.prefill_secrets;
    let include_secrets = prefill && state.server.is_authorized(authorization);

    let (defaults, note) = if include_secrets {
        (state.defaults.with_secrets(), None)
    } else if prefill {
        (state.defaults.without_secrets(), Some(NOTE_PREFILL_NEEDS_AUTH))
    } else {
        (state.defaults.without_secrets(), Some(NOTE_PREFILL_DISABLED))
    };

    Json(DefaultsResponse {
        ok: true,
        include_secrets,
        defaults,
        note,
    })
}

/// Run a provisioning request
///
/// The body is never logged. An empty or `null` body is treated as an empty request so the
/// caller gets the full list of missing fields.
pub async fn configure_roadshow(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let result: Result<ProvisionOutcome, ProvisionError> =
        state.provisioner.configure_roadshow(&request).await;
    match result {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => e.into_response(),
    }
}

fn parse_request(body: &[u8]) -> Result<ProvisioningRequest, &'static str> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ProvisioningRequest::default());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) => Ok(ProvisioningRequest::default()),
        Ok(value @ Value::Object(_)) => serde_json::from_value(value)
            .ok()
            .ok_or("Request body fields must be strings, numbers or booleans"),
        Ok(_) | Err(_) => Err("Request body must be a JSON object"),
    }
}

pub async fn api_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "API route not found")
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn metrics_text() -> Response {
    match metrics::gather_text() {
        Ok(text) => ([(CONTENT_TYPE, "text/plain; version=0.0.4")], text).into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
