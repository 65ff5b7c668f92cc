use crate::{
    config::KreaConfig,
    error::{RelayError, Result},
    models::{UpstreamCreateRequest, UpstreamReply},
    upstream::traits::ImageProvider,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

#[derive(Clone)]
pub struct KreaClient {
    client: Client,
    config: KreaConfig,
}

impl KreaClient {
    pub fn new(config: KreaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("poster-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RelayError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn token(&self) -> Result<&str> {
        self.config
            .api_token
            .as_deref()
            .ok_or(RelayError::MissingApiToken)
    }
}

#[async_trait]
impl ImageProvider for KreaClient {
    fn is_authenticated(&self) -> bool {
        self.config.api_token.is_some()
    }

    async fn create(&self, request: &UpstreamCreateRequest) -> Result<UpstreamReply> {
        let url = self.config.create_url();
        log::debug!(
            "Submitting generation to {} ({}x{})",
            url,
            request.width,
            request.height
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.token()?)
            .json(request)
            .send()
            .await
            .map_err(|e| RelayError::RequestError(format!("Krea create request failed: {}", e)))?;

        let status = response.status().as_u16();
        // An unparseable body is not fatal here; the caller decides what to do with `None`.
        let body = response.json::<Value>().await.ok();

        Ok(UpstreamReply { status, body })
    }

    async fn job_status(&self, job_id: &str) -> Result<Value> {
        let response = self
            .client
            .get(self.config.job_url(job_id)?)
            .bearer_auth(self.token()?)
            .send()
            .await
            .map_err(|e| RelayError::RequestError(format!("Krea job request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(RelayError::JobStatusFailed(response.status().as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RelayError::ResponseError(format!("Invalid job status body: {}", e)))
    }
}
