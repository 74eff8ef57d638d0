//! Error responses for the HTTP boundary.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lookout_core::AnswerFailure;
use serde::Serialize;

/// JSON body for every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_body: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    /// Request rejected before any work was done.
    InvalidRequest(String),
    /// The answer provider could not be reached.
    Upstream(AnswerFailure),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "invalid_request".to_string(),
                    message,
                    upstream_status: None,
                    upstream_body: None,
                },
            ),
            ApiError::Upstream(failure) => {
                let message = failure.to_string();
                let kind = failure.kind().to_string();
                let (upstream_status, upstream_body) = match failure {
                    AnswerFailure::Unavailable {
                        status_code, body, ..
                    } => (status_code, Some(body)),
                    _ => (None, None),
                };
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: kind,
                        message,
                        upstream_status,
                        upstream_body,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
