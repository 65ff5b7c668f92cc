use crate::{
    config::ProxyConfig,
    error::{RelayError, Result},
    models::DownloadedImage,
    upstream::ImageFetcher,
};
use chrono::Utc;
use std::sync::Arc;
use url::Url;

pub const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// Re-fetches generated images from allow-listed hosts for download.
#[derive(Clone)]
pub struct ImageProxy {
    fetcher: Arc<dyn ImageFetcher>,
    config: ProxyConfig,
}

impl ImageProxy {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, config: ProxyConfig) -> Self {
        Self { fetcher, config }
    }

    /// Checks run in order and stop at the first failure: present, parseable, https, allowed host.
    pub fn validate(&self, raw: Option<&str>) -> Result<Url> {
        let raw = raw.unwrap_or_default();
        if raw.is_empty() {
            return Err(RelayError::MissingUrl);
        }

        let url = Url::parse(raw).map_err(|e| RelayError::InvalidUrl(e.to_string()))?;

        if url.scheme() != "https" {
            return Err(RelayError::InvalidProtocol(url.scheme().to_string()));
        }

        let host = url.host_str().unwrap_or_default();
        if !self.config.is_allowed(host) {
            return Err(RelayError::HostNotAllowed(host.to_string()));
        }

        Ok(url)
    }

    pub async fn download(&self, raw: Option<&str>) -> Result<DownloadedImage> {
        let url = self.validate(raw)?;
        log::info!("Proxying image from {}", url.host_str().unwrap_or_default());

        let image = self.fetcher.fetch(&url).await?;
        if !(200..300).contains(&image.status) {
            log::warn!("Image fetch from {} returned {}", url, image.status);
            return Err(RelayError::ImageFetchFailed(image.status));
        }

        let content_type = image
            .content_type
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let filename = download_filename(&content_type, Utc::now().timestamp_millis());

        log::debug!("Serving {} ({} bytes) as {}", content_type, image.bytes.len(), filename);
        Ok(DownloadedImage {
            content_type,
            filename,
            bytes: image.bytes,
        })
    }
}

pub fn extension_for(content_type: &str) -> &'static str {
    if content_type.contains("jpeg") {
        "jpg"
    } else if content_type.contains("webp") {
        "webp"
    } else {
        "png"
    }
}

pub fn download_filename(content_type: &str, epoch_millis: i64) -> String {
    format!("poster_{}.{}", epoch_millis, extension_for(content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::stub::StubFetcher;

    fn proxy(fetcher: &Arc<StubFetcher>) -> ImageProxy {
        ImageProxy::new(fetcher.clone(), ProxyConfig::default())
    }

    fn ok_fetcher(content_type: Option<&str>) -> Arc<StubFetcher> {
        Arc::new(StubFetcher::new(200, content_type, b"\x89PNG"))
    }

    #[test]
    fn test_validation_order() {
        let proxy = proxy(&ok_fetcher(None));

        assert!(matches!(proxy.validate(None), Err(RelayError::MissingUrl)));
        assert!(matches!(proxy.validate(Some("")), Err(RelayError::MissingUrl)));
        assert!(matches!(
            proxy.validate(Some("not a url")),
            Err(RelayError::InvalidUrl(_))
        ));
        assert!(matches!(
            proxy.validate(Some("http://gen.krea.ai/x.png")),
            Err(RelayError::InvalidProtocol(_))
        ));
        // Protocol is checked before the host.
        assert!(matches!(
            proxy.validate(Some("ftp://evil.example/x.png")),
            Err(RelayError::InvalidProtocol(_))
        ));
        assert!(matches!(
            proxy.validate(Some("https://evil.example/x.png")),
            Err(RelayError::HostNotAllowed(host)) if host == "evil.example"
        ));
        assert!(proxy.validate(Some("https://gen.krea.ai/x.png")).is_ok());
        assert!(proxy.validate(Some("https://Cdn.Krea.AI/x.png")).is_ok());
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("image/webp"), "webp");
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/gif"), "png");
        assert_eq!(extension_for("application/octet-stream"), "png");
        assert_eq!(download_filename("image/jpeg", 1714521600000), "poster_1714521600000.jpg");
    }

    #[tokio::test]
    async fn test_download_passes_through_bytes() {
        let fetcher = ok_fetcher(Some("image/webp"));
        let image = proxy(&fetcher)
            .download(Some("https://gen.krea.ai/x.webp"))
            .await
            .unwrap();

        assert_eq!(image.content_type, "image/webp");
        assert_eq!(image.bytes, b"\x89PNG");
        assert!(image.filename.starts_with("poster_"));
        assert!(image.filename.ends_with(".webp"));
        assert_eq!(fetcher.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_content_type_defaults_to_png() {
        let image = proxy(&ok_fetcher(None))
            .download(Some("https://krea.ai/x"))
            .await
            .unwrap();
        assert_eq!(image.content_type, "image/png");
        assert!(image.filename.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_rejected_urls_are_never_fetched() {
        let fetcher = ok_fetcher(None);
        let result = proxy(&fetcher)
            .download(Some("https://evil.example/x.png"))
            .await;
        assert!(matches!(result, Err(RelayError::HostNotAllowed(_))));
        assert_eq!(fetcher.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_upstream_status_failure() {
        let fetcher = Arc::new(StubFetcher::new(404, None, b""));
        let result = proxy(&fetcher)
            .download(Some("https://gen.krea.ai/gone.png"))
            .await;
        assert!(matches!(result, Err(RelayError::ImageFetchFailed(404))));
    }
}
