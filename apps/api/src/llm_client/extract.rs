//! Tolerant extraction of a JSON object from noisy model output.
//!
//! Models wrap JSON in code fences, prefix it with commentary, or return prose.
//! `extract_json_object` never fails: anything it cannot read as an object is `None`.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Internal model-output field stripped before anything is displayed.
pub const SCRATCH_FIELD: &str = "hook";

/// Opening fence plus an optional language tag, case-insensitive.
fn opening_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^```(?:json|javascript|answer|ans|text|txt|code|output)?\s*")
            .expect("static fence pattern")
    })
}

/// Parses the first `{` .. last `}` span of `text` as a JSON object and removes
/// the scratch field at every depth. Returns `None` for empty input, prose,
/// truncated or malformed JSON, and JSON that is not an object.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let candidate = strip_code_fence(text.trim());
    if candidate.is_empty() {
        return None;
    }

    let candidate = match (candidate.find('{'), candidate.rfind('}')) {
        (Some(first), Some(last)) if last > first => &candidate[first..=last],
        _ => candidate,
    };

    let mut value: Value = serde_json::from_str(candidate).ok()?;
    remove_field_recursive(&mut value, SCRATCH_FIELD);

    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Strips a leading ```` ```tag ```` fence and a trailing ```` ``` ````, if present.
fn strip_code_fence(text: &str) -> &str {
    if !text.starts_with("```") {
        return text;
    }
    let body = match opening_fence().find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim_end()
}

/// Removes `field` from every object in the tree, descending through arrays.
pub fn remove_field_recursive(value: &mut Value, field: &str) {
    match value {
        Value::Object(map) => {
            map.remove(field);
            for child in map.values_mut() {
                remove_field_recursive(child, field);
            }
        }
        Value::Array(items) => {
            for item in items {
                remove_field_recursive(item, field);
            }
        }
        _ => {}
    }
}
