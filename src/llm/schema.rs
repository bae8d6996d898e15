use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    llm::sanitizer::{self, kind_of},
    types::{Recommendation, RecommendationSet},
};

/// Number of recommendations the model must return.
pub const RECOMMENDATION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("the answer is not JSON")]
    NotJson,
    #[error("the answer is JSON but not an object")]
    NotAnObject,
    #[error("missing key `{0}`")]
    MissingKey(&'static str),
    #[error("`{key}` should be {expected}, got {found}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("expected exactly {expected} recommendations, got {actual}")]
    WrongCount { expected: usize, actual: usize },
    #[error("recommendation {index}: {problem}")]
    InvalidRecommendation { index: usize, problem: String },
}

/// Sanitizes raw model text and validates it into a [`RecommendationSet`].
///
/// Text that does not yield a JSON object is reported by the sanitizer and
/// comes back as [`ShapeError::NotJson`] or [`ShapeError::NotAnObject`].
pub fn parse_recommendations(raw: &str) -> Result<RecommendationSet, ShapeError> {
    match sanitizer::parse_json_object(raw) {
        Some(root) => validate_object(&root),
        None => Err(unparsed_kind(raw)),
    }
}

/// Checks the parsed answer against the schema the prompt asks for.
pub fn validate(value: &Value) -> Result<RecommendationSet, ShapeError> {
    match value {
        Value::Object(root) => validate_object(root),
        _ => Err(ShapeError::NotAnObject),
    }
}

fn validate_object(root: &Map<String, Value>) -> Result<RecommendationSet, ShapeError> {
    let detected_mood = required_str(root, "detected_mood")?.trim().to_string();

    let items = match root.get("recommendations") {
        None => return Err(ShapeError::MissingKey("recommendations")),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ShapeError::WrongType {
                key: "recommendations",
                expected: "an array",
                found: kind_of(other),
            });
        }
    };

    if items.len() != RECOMMENDATION_COUNT {
        return Err(ShapeError::WrongCount {
            expected: RECOMMENDATION_COUNT,
            actual: items.len(),
        });
    }

    let recommendations = items
        .iter()
        .enumerate()
        .map(|(index, item)| recommendation(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RecommendationSet {
        detected_mood,
        recommendations,
    })
}

/// Why the sanitizer produced no object: valid JSON of another kind, or no
/// JSON at all.
fn unparsed_kind(raw: &str) -> ShapeError {
    let candidate = sanitizer::extract_json_object(raw);
    match serde_json::from_str::<Value>(&candidate) {
        Ok(_) => ShapeError::NotAnObject,
        Err(_) => ShapeError::NotJson,
    }
}

fn recommendation(index: usize, item: &Value) -> Result<Recommendation, ShapeError> {
    let Value::Object(fields) = item else {
        return Err(ShapeError::InvalidRecommendation {
            index,
            problem: format!("expected an object, got {}", kind_of(item)),
        });
    };

    let field = |key: &'static str| {
        required_str(fields, key).map_err(|e| ShapeError::InvalidRecommendation {
            index,
            problem: e.to_string(),
        })
    };

    Ok(Recommendation {
        title: field("title")?.trim().to_string(),
        artist: field("artist")?.trim().to_string(),
        // absent, null or non-string URIs are treated as unknown
        uri: fields
            .get("uri")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string(),
        reason: field("reason")?.trim().to_string(),
    })
}

fn required_str<'a>(map: &'a Map<String, Value>, key: &'static str) -> Result<&'a str, ShapeError> {
    match map.get(key) {
        None => Err(ShapeError::MissingKey(key)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(ShapeError::WrongType {
            key,
            expected: "a string",
            found: kind_of(other),
        }),
    }
}
