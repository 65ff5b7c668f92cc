use crate::{
    config::ProxyConfig,
    error::{RelayError, Result},
    models::UpstreamImage,
    upstream::traits::ImageFetcher,
};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect, Client};
use std::time::Duration;
use url::Url;

const MAX_REDIRECTS: usize = 5;

/// True when `url` may be fetched: https and an allow-listed hostname.
pub fn is_fetchable(proxy: &ProxyConfig, url: &Url) -> bool {
    url.scheme() == "https" && url.host_str().map_or(false, |host| proxy.is_allowed(host))
}

#[derive(Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(proxy: ProxyConfig, timeout: Duration) -> Result<Self> {
        // Redirects may only stay inside the allow-list.
        let policy = redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS || !is_fetchable(&proxy, attempt.url()) {
                attempt.stop()
            } else {
                attempt.follow()
            }
        });

        let client = Client::builder()
            .timeout(timeout)
            .redirect(policy)
            .build()
            .map_err(|e| RelayError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &Url) -> Result<UpstreamImage> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RelayError::RequestError(format!("Image request failed: {}", e)))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Ok(UpstreamImage {
                status,
                content_type: None,
                bytes: Vec::new(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::ResponseError(format!("Failed to read image body: {}", e)))?;

        Ok(UpstreamImage {
            status,
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_fetchable() {
        let proxy = ProxyConfig::default();
        let check = |raw: &str| is_fetchable(&proxy, &Url::parse(raw).unwrap());

        assert!(check("https://gen.krea.ai/images/a.png"));
        assert!(check("https://CDN.KREA.AI/a.webp"));
        assert!(check("https://krea.ai:8443/a.png"));
        assert!(!check("http://gen.krea.ai/a.png"));
        assert!(!check("https://evil.example/a.png"));
        assert!(!check("https://gen.krea.ai.evil.example/a.png"));
    }
}
