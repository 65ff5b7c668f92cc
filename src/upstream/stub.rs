use crate::{
    error::{RelayError, Result},
    models::{UpstreamCreateRequest, UpstreamImage, UpstreamReply},
    upstream::traits::{ImageFetcher, ImageProvider},
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;
use url::Url;

/// Scripted provider. Job statuses are served in order; the last one repeats.
pub struct StubProvider {
    authenticated: bool,
    reply: UpstreamReply,
    statuses: Mutex<VecDeque<Result<Value>>>,
    last_status: Value,
    pub created: Mutex<Vec<UpstreamCreateRequest>>,
    pub polled_at: Mutex<Vec<Instant>>,
}

impl StubProvider {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self {
            authenticated: true,
            reply: UpstreamReply { status, body },
            statuses: Mutex::new(VecDeque::new()),
            last_status: Value::Null,
            created: Mutex::new(Vec::new()),
            polled_at: Mutex::new(Vec::new()),
        }
    }

    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn with_statuses(mut self, statuses: Vec<Value>) -> Self {
        self.last_status = statuses.last().cloned().unwrap_or(Value::Null);
        self.statuses = Mutex::new(statuses.into_iter().map(Ok).collect());
        self
    }

    pub fn with_status_error(self, err: RelayError) -> Self {
        self.statuses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn poll_count(&self) -> usize {
        self.polled_at.lock().unwrap().len()
    }

    pub fn create_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageProvider for StubProvider {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn create(&self, request: &UpstreamCreateRequest) -> Result<UpstreamReply> {
        self.created.lock().unwrap().push(request.clone());
        Ok(self.reply.clone())
    }

    async fn job_status(&self, _job_id: &str) -> Result<Value> {
        self.polled_at.lock().unwrap().push(Instant::now());
        match self.statuses.lock().unwrap().pop_front() {
            Some(next) => next,
            None => Ok(self.last_status.clone()),
        }
    }
}

pub struct StubFetcher {
    image: UpstreamImage,
    pub fetched: Mutex<Vec<Url>>,
}

impl StubFetcher {
    pub fn new(status: u16, content_type: Option<&str>, bytes: &[u8]) -> Self {
        Self {
            image: UpstreamImage {
                status,
                content_type: content_type.map(str::to_string),
                bytes: bytes.to_vec(),
            },
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageFetcher for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<UpstreamImage> {
        self.fetched.lock().unwrap().push(url.clone());
        if self.image.status == 0 {
            return Err(RelayError::RequestError("connection refused".into()));
        }
        Ok(self.image.clone())
    }
}
