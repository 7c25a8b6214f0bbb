//! # Error Responses
//!
//! Maps provisioning errors onto JSON responses. Validation problems are the caller's fault
//! (400); everything else is a server error (500) with the pipeline diagnostics attached.

use crate::provision::{ErrorClass, PipelineReport, ProvisionError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    ok: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a PipelineReport>,
}

impl ErrorClass {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorClass::BadInput => StatusCode::BAD_REQUEST,
            ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProvisionError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            ok: false,
            error: self.to_string(),
            details: self.details(),
        };
        (self.class().status_code(), Json(body)).into_response()
    }
}

/// Plain `{ ok: false, error }` response
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        ok: false,
        error: message.into(),
        details: None,
    };
    (status, Json(body)).into_response()
}
