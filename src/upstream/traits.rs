use crate::{
    error::Result,
    models::{UpstreamCreateRequest, UpstreamImage, UpstreamReply},
};
use async_trait::async_trait;
use serde_json::Value;
use url::Url;

/// The external generation service: submits prompts and reports job status.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Whether a credential is available for authenticated calls.
    fn is_authenticated(&self) -> bool;

    async fn create(&self, request: &UpstreamCreateRequest) -> Result<UpstreamReply>;

    async fn job_status(&self, job_id: &str) -> Result<Value>;
}

/// Unauthenticated fetch of an already validated image URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<UpstreamImage>;
}
