use crate::error::RelayError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::{json, Value};
use std::fmt;

/// An HTTP error: status plus a JSON body whose `error` field is a machine-readable code.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    fn code_only(status: StatusCode, code: &str) -> Self {
        Self::new(status, json!({ "error": code }))
    }

    /// Errors from the generation endpoint; anything unclassified is `generation_failed`.
    pub fn for_generation(err: RelayError) -> Self {
        match err {
            RelayError::MissingPrompt => Self::code_only(StatusCode::BAD_REQUEST, err.code()),
            RelayError::MissingApiToken => {
                Self::code_only(StatusCode::INTERNAL_SERVER_ERROR, err.code())
            }
            RelayError::UpstreamCreateFailed { status, detail } => Self::new(
                StatusCode::BAD_GATEWAY,
                json!({
                    "error": "upstream_create_failed",
                    "status": status,
                    "detail": detail,
                }),
            ),
            RelayError::JobFailed(detail) => Self::new(
                StatusCode::BAD_GATEWAY,
                json!({ "error": "job_failed", "detail": detail }),
            ),
            other => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "generation_failed", "detail": other.to_string() }),
            ),
        }
    }

    /// Errors from the download endpoint; anything unclassified is `download_failed`.
    pub fn for_download(err: RelayError) -> Self {
        match err {
            RelayError::ImageFetchFailed(status) => Self::new(
                StatusCode::BAD_GATEWAY,
                json!({ "error": "image_fetch_failed", "status": status }),
            ),
            err if err.is_client_error() => Self::code_only(StatusCode::BAD_REQUEST, err.code()),
            other => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "download_failed", "detail": other.to_string() }),
            ),
        }
    }

    pub fn unexpected_output_shape(output: Option<Value>) -> Self {
        Self::new(
            StatusCode::BAD_GATEWAY,
            json!({ "error": "unexpected_output_shape", "output": output }),
        )
    }

    pub fn invalid_body(detail: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            json!({ "error": "invalid_body", "detail": detail.to_string() }),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn code(&self) -> &str {
        self.body["error"].as_str().unwrap_or("unknown_error")
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.status)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        if self.status.is_server_error() {
            log::error!("Request failed: {}", self.body);
        } else {
            log::debug!("Request rejected: {}", self.body);
        }
        HttpResponse::build(self.status).json(&self.body)
    }
}
