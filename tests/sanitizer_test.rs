use moodtape::llm::{
    sanitizer::{extract_json_object, parse_json_object},
    schema::{ShapeError, parse_recommendations},
};
use serde_json::{Value, json};

fn parsed(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

fn answer(recommendations: usize) -> Value {
    let recs: Vec<Value> = (0..recommendations)
        .map(|i| {
            json!({
                "title": format!("Song {}", i),
                "artist": "Band",
                "uri": "",
                "reason": "fits"
            })
        })
        .collect();
    json!({ "detected_mood": "quiet focus", "recommendations": recs })
}

#[test]
fn test_extract_from_fenced_text_with_commentary() {
    let embedded = answer(4);
    let wrappings = [
        format!("```json\n{}\n```", embedded),
        format!("```\n{}\n```", embedded),
        format!("Sure! Here you go:\n{}\nEnjoy the music.", embedded),
        format!("Here it is:\n```json\n{}\n```\nHope that helps", embedded),
        format!("  {}  ", serde_json::to_string_pretty(&embedded).unwrap()),
    ];

    for text in wrappings {
        assert_eq!(parsed(&extract_json_object(&text)), embedded, "{}", text);
    }
}

#[test]
fn test_extract_without_braces_returns_trimmed_input() {
    let text = "  I could not think of anything, sorry.  ";
    assert_eq!(
        extract_json_object(text),
        "I could not think of anything, sorry."
    );
    assert!(parse_json_object(text).is_none());
    assert_eq!(parse_recommendations(text), Err(ShapeError::NotJson));
}

#[test]
fn test_extract_strips_tagged_fence() {
    assert_eq!(extract_json_object("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
}

#[test]
fn test_extract_strips_bare_fence() {
    let raw = "  ```\n{\"a\": [1, 2]}\n```  ";
    assert_eq!(extract_json_object(raw), "{\"a\": [1, 2]}");
}

#[test]
fn test_extract_returns_unfenced_json_as_is() {
    assert_eq!(extract_json_object(" {\"a\":1} "), "{\"a\":1}");
}

#[test]
fn test_extract_fenced_text_without_braces_keeps_trimmed_input() {
    let raw = "\n```\nhello\n```\n";
    assert_eq!(extract_json_object(raw), "```\nhello\n```");
    assert_eq!(parse_recommendations(raw), Err(ShapeError::NotJson));
}

#[test]
fn test_parse_json_object_rejects_non_objects() {
    assert!(parse_json_object("[1, 2, 3]").is_none());
    assert!(parse_json_object("\"just a string\"").is_none());
    assert!(parse_json_object("```json\n{\"a\": 1}\n```").is_some());
}

#[test]
fn test_parse_fenced_answer() {
    let text = format!("```json\n{}\n```", answer(4));
    let set = parse_recommendations(&text).unwrap();

    assert_eq!(set.detected_mood, "quiet focus");
    assert_eq!(set.recommendations.len(), 4);
    assert!(set.recommendations.iter().all(|r| r.uri.is_empty()));
}

#[test]
fn test_missing_recommendations_key() {
    let text = json!({ "detected_mood": "calm" }).to_string();
    assert_eq!(
        parse_recommendations(&text),
        Err(ShapeError::MissingKey("recommendations"))
    );
}

#[test]
fn test_wrong_recommendation_count() {
    let text = answer(3).to_string();
    assert_eq!(
        parse_recommendations(&text),
        Err(ShapeError::WrongCount {
            expected: 4,
            actual: 3
        })
    );
}

#[test]
fn test_non_object_answer() {
    assert_eq!(
        parse_recommendations("[1, 2, 3, 4]"),
        Err(ShapeError::NotAnObject)
    );
    assert_eq!(
        parse_recommendations("```json\n42\n```"),
        Err(ShapeError::NotAnObject)
    );
}

#[test]
fn test_recommendations_must_be_an_array() {
    let text = json!({ "detected_mood": "calm", "recommendations": "none" }).to_string();
    assert!(matches!(
        parse_recommendations(&text),
        Err(ShapeError::WrongType {
            key: "recommendations",
            ..
        })
    ));
}

#[test]
fn test_recommendation_missing_title() {
    let mut value = answer(4);
    value["recommendations"][2]
        .as_object_mut()
        .unwrap()
        .remove("title");

    assert!(matches!(
        parse_recommendations(&value.to_string()),
        Err(ShapeError::InvalidRecommendation { index: 2, .. })
    ));
}

#[test]
fn test_null_or_missing_uri_becomes_empty() {
    let mut value = answer(4);
    value["recommendations"][0]["uri"] = Value::Null;
    value["recommendations"][1]
        .as_object_mut()
        .unwrap()
        .remove("uri");
    value["recommendations"][2]["uri"] = json!(" spotify:track:abc123 ");

    let set = parse_recommendations(&value.to_string()).unwrap();
    assert_eq!(set.recommendations[0].uri, "");
    assert_eq!(set.recommendations[1].uri, "");
    assert_eq!(set.recommendations[2].uri, "spotify:track:abc123");
}
