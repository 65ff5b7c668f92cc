use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Body sent to the upstream image-generation endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamCreateRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
}

impl UpstreamCreateRequest {
    pub fn new(prompt: impl Into<String>, size: ImageSize) -> Self {
        Self {
            prompt: prompt.into(),
            width: size.width,
            height: size.height,
        }
    }
}

/// Raw reply to the create call. `body` is `None` when it was not valid JSON.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: Option<Value>,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Job identifier for async completion. Numeric ids are accepted as well.
    pub fn job_id(&self) -> Option<String> {
        match self.body.as_ref()?.get("job_id")? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Image as returned by an allow-listed host.
#[derive(Debug, Clone)]
pub struct UpstreamImage {
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadQuery {
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DownloadedImage {
    pub content_type: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl DownloadedImage {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_body() {
        let body = UpstreamCreateRequest::new(
            "a poster",
            ImageSize {
                width: 1536,
                height: 1024,
            },
        );
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"prompt": "a poster", "width": 1536, "height": 1024})
        );
    }

    #[test]
    fn test_job_id_shapes() {
        let reply = |body| UpstreamReply {
            status: 200,
            body: Some(body),
        };
        assert_eq!(reply(json!({"job_id": "j-1"})).job_id().as_deref(), Some("j-1"));
        assert_eq!(reply(json!({"job_id": 42})).job_id().as_deref(), Some("42"));
        assert_eq!(reply(json!({"job_id": ""})).job_id(), None);
        assert_eq!(reply(json!({"id": "j-1"})).job_id(), None);

        let empty = UpstreamReply {
            status: 200,
            body: None,
        };
        assert_eq!(empty.job_id(), None);
    }

    #[test]
    fn test_content_disposition() {
        let image = DownloadedImage {
            content_type: "image/png".into(),
            filename: "poster_1.png".into(),
            bytes: vec![],
        };
        assert_eq!(
            image.content_disposition(),
            "attachment; filename=\"poster_1.png\""
        );
    }
}
