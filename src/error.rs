use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No prompt could be resolved for the request")]
    MissingPrompt,
    #[error("Upstream API token is not configured")]
    MissingApiToken,
    #[error("Upstream create request failed with status {status}")]
    UpstreamCreateFailed { status: u16, detail: Option<Value> },
    #[error("Upstream job failed: {0}")]
    JobFailed(String),
    #[error("job_status_failed_{0}")]
    JobStatusFailed(u16),

    #[error("Missing image url")]
    MissingUrl,
    #[error("Invalid image url: {0}")]
    InvalidUrl(String),
    #[error("Unsupported protocol: {0}")]
    InvalidProtocol(String),
    #[error("Host not allowed: {0}")]
    HostNotAllowed(String),
    #[error("Image fetch failed with status {0}")]
    ImageFetchFailed(u16),

    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
}

impl RelayError {
    /// Machine-readable code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            RelayError::MissingPrompt => "missing_prompt",
            RelayError::MissingApiToken => "missing_api_token",
            RelayError::UpstreamCreateFailed { .. } => "upstream_create_failed",
            RelayError::JobFailed(_) => "job_failed",
            RelayError::JobStatusFailed(_) => "job_status_failed",
            RelayError::MissingUrl => "missing_url",
            RelayError::InvalidUrl(_) => "invalid_url",
            RelayError::InvalidProtocol(_) => "invalid_protocol",
            RelayError::HostNotAllowed(_) => "host_not_allowed",
            RelayError::ImageFetchFailed(_) => "image_fetch_failed",
            RelayError::ConfigError(_) => "config_error",
            RelayError::RequestError(_) => "request_error",
            RelayError::ResponseError(_) => "response_error",
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RelayError::MissingPrompt
                | RelayError::MissingUrl
                | RelayError::InvalidUrl(_)
                | RelayError::InvalidProtocol(_)
                | RelayError::HostNotAllowed(_)
        )
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::RequestError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
