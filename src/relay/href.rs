//! Normalizes the many response shapes the provider has used into one image URL.
//!
//! Each extractor looks at a single shape and returns `None` when it does not apply.
//! They are tried in a fixed order and the first hit wins. Only when none applies is a
//! wrapper entered, and the first set wrapper decides the result on its own.

use crate::models::is_truthy;
use serde_json::Value;

type Extractor = fn(&Value) -> Option<String>;

const EXTRACTORS: [Extractor; 6] = [
    bare_string,
    image_url_field,
    url_field,
    first_of_urls,
    nested_image_url,
    first_of_images,
];

const WRAPPERS: [&str; 2] = ["output", "result"];

/// Returns the first image URL found in `payload`, or `None`.
pub fn extract_href(payload: &Value) -> Option<String> {
    EXTRACTORS
        .iter()
        .find_map(|extract| extract(payload))
        .or_else(|| within_wrapper(payload))
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn bare_string(payload: &Value) -> Option<String> {
    non_empty_str(Some(payload))
}

fn image_url_field(payload: &Value) -> Option<String> {
    non_empty_str(payload.get("image_url"))
}

fn url_field(payload: &Value) -> Option<String> {
    non_empty_str(payload.get("url"))
}

fn first_of_urls(payload: &Value) -> Option<String> {
    non_empty_str(payload.get("urls")?.as_array()?.first())
}

fn nested_image_url(payload: &Value) -> Option<String> {
    non_empty_str(payload.get("image")?.get("url"))
}

fn first_of_images(payload: &Value) -> Option<String> {
    let first = payload.get("images")?.as_array()?.first()?;
    non_empty_str(Some(first))
        .or_else(|| non_empty_str(first.get("url")))
        .or_else(|| non_empty_str(first.get("image_url")))
}

/// `.result` is never consulted once `.output` is set.
fn within_wrapper(payload: &Value) -> Option<String> {
    let inner = WRAPPERS
        .iter()
        .filter_map(|key| payload.get(*key))
        .find(|value| is_truthy(value))?;
    extract_href(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_shapes_resolve_to_same_url() {
        let payloads = [
            json!({"images": [{"url": "X"}]}),
            json!({"output": {"image_url": "X"}}),
            json!({"result": {"urls": ["X"]}}),
            json!("X"),
            json!({"image_url": "X"}),
            json!({"url": "X"}),
            json!({"image": {"url": "X"}}),
            json!({"images": ["X"]}),
            json!({"images": [{"image_url": "X"}]}),
            json!({"result": {"output": {"images": [{"url": "X"}]}}}),
        ];
        for payload in payloads {
            assert_eq!(extract_href(&payload).as_deref(), Some("X"), "{payload}");
        }
    }

    #[test]
    fn test_precedence() {
        let payload = json!({
            "result": {"url": "from-result"},
            "output": "from-output",
            "images": ["from-images"],
            "url": "from-url",
            "image_url": "from-image-url"
        });
        assert_eq!(extract_href(&payload).as_deref(), Some("from-image-url"));

        let payload = json!({"result": {"url": "from-result"}, "urls": ["from-urls"]});
        assert_eq!(extract_href(&payload).as_deref(), Some("from-urls"));

        let payload = json!({"images": [{"url": "a", "image_url": "b"}]});
        assert_eq!(extract_href(&payload).as_deref(), Some("a"));
    }

    #[test]
    fn test_unmatched_shapes_yield_none() {
        let payloads = [
            Value::Null,
            json!(""),
            json!(42),
            json!({}),
            json!({"job_id": "abc", "status": "queued"}),
            json!({"urls": []}),
            json!({"images": []}),
            json!({"images": [{"width": 10}]}),
            json!({"image_url": null, "url": 7}),
            json!({"output": null}),
        ];
        for payload in payloads {
            assert_eq!(extract_href(&payload), None, "{payload}");
        }
    }

    #[test]
    fn test_set_output_shadows_result() {
        let payload = json!({"output": {"status": "pending"}, "result": {"url": "X"}});
        assert_eq!(extract_href(&payload), None);

        let payload = json!({"output": ["pending"], "result": "X"});
        assert_eq!(extract_href(&payload), None);
    }

    #[test]
    fn test_unset_output_falls_back_to_result() {
        for output in [json!(null), json!(""), json!(0), json!(false)] {
            let payload = json!({"output": output, "result": {"url": "X"}});
            assert_eq!(extract_href(&payload).as_deref(), Some("X"), "{payload}");
        }
    }
}
