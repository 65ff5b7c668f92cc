use crate::models::GenerationRequest;

pub const STYLE_CLAUSE: &str =
    "clear readable text, modern typography, high contrast, professional composition";

/// Builds a descriptive prompt from the form fields. Never returns an empty string.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let subject = if request.event_name.is_empty() {
        "an event"
    } else {
        request.event_name.as_str()
    };

    let clauses = [
        Some(format!("{} design for {}", request.kind().label(), subject)),
        non_empty(&request.theme).map(str::to_string),
        non_empty(&request.event_type).map(|event_type| format!("{} theme", event_type)),
        non_empty(&request.date).map(|date| format!("Date: {}", date)),
        Some(STYLE_CLAUSE.to_string()),
        non_empty(&request.extra_prompt).map(str::to_string),
    ];

    clauses.into_iter().flatten().collect::<Vec<_>>().join(", ")
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
