use crate::models::is_truthy;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn default_aspect_ratio() -> Option<String> {
    Some("3:2".to_string())
}

fn default_generation_type() -> String {
    "poster".to_string()
}

/// Unset values (null, false, 0, "") read as absent; other scalars are stringified.
fn lenient_text(value: Value) -> Option<String> {
    if !is_truthy(&value) {
        return None;
    }
    Some(match value {
        Value::String(text) => text,
        other => other.to_string(),
    })
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(Value::deserialize(deserializer)?))
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

/// Form fields posted by the browser. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default, deserialize_with = "optional_text")]
    pub prompt: Option<String>,
    #[serde(
        rename = "aspect_ratio",
        alias = "aspectRatio",
        default = "default_aspect_ratio",
        deserialize_with = "optional_text"
    )]
    pub aspect_ratio: Option<String>,
    #[serde(default = "default_generation_type", deserialize_with = "text")]
    pub generation_type: String,
    #[serde(default, deserialize_with = "text")]
    pub event_name: String,
    #[serde(default, deserialize_with = "text")]
    pub theme: String,
    #[serde(default, deserialize_with = "text")]
    pub date: String,
    #[serde(default, deserialize_with = "text")]
    pub event_type: String,
    #[serde(default, deserialize_with = "text")]
    pub extra_prompt: String,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        GenerationRequest {
            prompt: None,
            aspect_ratio: default_aspect_ratio(),
            generation_type: default_generation_type(),
            event_name: String::new(),
            theme: String::new(),
            date: String::new(),
            event_type: String::new(),
            extra_prompt: String::new(),
        }
    }
}

impl GenerationRequest {
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_aspect_ratio(mut self, token: impl Into<String>) -> Self {
        self.aspect_ratio = Some(token.into());
        self
    }

    pub fn kind(&self) -> GenerationType {
        GenerationType::from_label(&self.generation_type)
    }

    /// The explicit prompt, if it carries anything besides whitespace.
    pub fn explicit_prompt(&self) -> Option<&str> {
        self.prompt
            .as_deref()
            .filter(|prompt| !prompt.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationType {
    Poster,
    Logo,
}

impl GenerationType {
    /// Only the exact token "logo" selects a logo; anything else is a poster.
    pub fn from_label(label: &str) -> Self {
        if label == "logo" {
            GenerationType::Logo
        } else {
            GenerationType::Poster
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GenerationType::Poster => "Poster",
            GenerationType::Logo => "Logo",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    pub href: String,
}

/// How a generation request ended when it did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Resolved { href: String, attempts: u32 },
    /// No image reference was found, either immediately or after polling.
    NoImage { output: Option<Value> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_uses_defaults() {
        let request: GenerationRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.aspect_ratio.as_deref(), Some("3:2"));
        assert_eq!(request.generation_type, "poster");
        assert_eq!(request.kind(), GenerationType::Poster);
        assert!(request.explicit_prompt().is_none());
    }

    #[test]
    fn test_form_field_names() {
        let request: GenerationRequest = serde_json::from_value(json!({
            "generationType": "logo",
            "eventName": "Acme Launch",
            "eventType": "corporate",
            "extraPrompt": "neon colors",
            "aspect_ratio": "16:9"
        }))
        .unwrap();
        assert_eq!(request.kind(), GenerationType::Logo);
        assert_eq!(request.event_name, "Acme Launch");
        assert_eq!(request.event_type, "corporate");
        assert_eq!(request.extra_prompt, "neon colors");
        assert_eq!(request.aspect_ratio.as_deref(), Some("16:9"));
    }

    #[test]
    fn test_null_and_scalar_fields_are_tolerated() {
        let request: GenerationRequest = serde_json::from_value(json!({
            "eventName": "Fest",
            "theme": null,
            "generationType": null,
            "date": 2024,
            "eventType": false,
            "extraPrompt": 0,
            "aspect_ratio": null
        }))
        .unwrap();
        assert_eq!(request.event_name, "Fest");
        assert_eq!(request.theme, "");
        assert_eq!(request.kind(), GenerationType::Poster);
        assert_eq!(request.date, "2024");
        assert_eq!(request.event_type, "");
        assert_eq!(request.extra_prompt, "");
        assert_eq!(request.aspect_ratio, None);
    }

    #[test]
    fn test_prompt_accepts_scalars() {
        let request: GenerationRequest = serde_json::from_value(json!({"prompt": 42})).unwrap();
        assert_eq!(request.explicit_prompt(), Some("42"));

        for prompt in [json!(null), json!(0), json!(false), json!("")] {
            let request: GenerationRequest =
                serde_json::from_value(json!({ "prompt": prompt })).unwrap();
            assert!(request.explicit_prompt().is_none(), "{prompt}");
        }
    }

    #[test]
    fn test_blank_prompt_is_not_explicit() {
        let request = GenerationRequest::default().with_prompt("   ");
        assert!(request.explicit_prompt().is_none());

        let request = GenerationRequest::default().with_prompt(" a red fox ");
        assert_eq!(request.explicit_prompt(), Some(" a red fox "));
    }

    #[test]
    fn test_generation_type_is_case_sensitive() {
        assert_eq!(GenerationType::from_label("logo"), GenerationType::Logo);
        assert_eq!(GenerationType::from_label("Logo"), GenerationType::Poster);
        assert_eq!(GenerationType::from_label(""), GenerationType::Poster);
    }
}
