use serde_json::{Map, Value};

use crate::{utils, warning};

const FENCE: &str = "```";

/// Pulls the JSON object out of raw model text.
///
/// Code fences (with or without a language tag) are removed. If what is
/// left parses, it is returned unchanged; otherwise the span from the first
/// `{` to the last `}` is returned. Without such a span the trimmed input is
/// returned unchanged, fences included, and the caller's parse fails.
pub fn extract_json_object(raw: &str) -> String {
    let trimmed = raw.trim();
    let text = strip_fences(trimmed);

    if serde_json::from_str::<Value>(text).is_ok() {
        return text.to_string();
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => text[start..=end].to_string(),
        _ => trimmed.to_string(),
    }
}

/// Parses model text into a JSON object.
///
/// Non-JSON text or a JSON value that is not an object gives `None` and a
/// warning.
pub fn parse_json_object(raw: &str) -> Option<Map<String, Value>> {
    let candidate = extract_json_object(raw);
    match serde_json::from_str::<Value>(&candidate) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            warning!("Model returned JSON that is not an object: {}", kind_of(&other));
            None
        }
        Err(e) => {
            warning!(
                "Model returned non-JSON output ({}): {}",
                e,
                utils::truncate(&candidate, 120)
            );
            None
        }
    }
}

fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };

    // language tag such as `json`
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    let rest = rest.trim_end();
    rest.strip_suffix(FENCE).unwrap_or(rest).trim()
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
