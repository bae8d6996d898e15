mod common;

use std::time::Duration;

use common::*;
use moodtape::spotify::{
    ApiError,
    client::{classify_response, parse_retry_after},
    collector::{self, TopKind},
};
use reqwest::{
    StatusCode,
    header::{HeaderMap, HeaderValue, RETRY_AFTER},
};
use serde_json::json;
use tempfile::TempDir;

// Helper function to build headers carrying a Retry-After value
fn retry_after(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(RETRY_AFTER, HeaderValue::from_str(value).unwrap());
    headers
}

#[test]
fn test_rate_limit_reads_retry_after_header() {
    let result = classify_response(StatusCode::TOO_MANY_REQUESTS, &retry_after("2"), "");
    assert!(matches!(
        result,
        Err(ApiError::RateLimited {
            retry_after: Some(2)
        })
    ));
}

#[test]
fn test_rate_limit_without_usable_header() {
    for headers in [HeaderMap::new(), retry_after("soon"), retry_after("-1")] {
        let result = classify_response(StatusCode::TOO_MANY_REQUESTS, &headers, "");
        assert!(matches!(
            result,
            Err(ApiError::RateLimited { retry_after: None })
        ));
    }
}

#[test]
fn test_parse_retry_after() {
    assert_eq!(parse_retry_after(" 7 "), Some(7));
    assert_eq!(parse_retry_after("1.5"), None);
    assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
}

#[test]
fn test_error_statuses_map_to_api_errors() {
    let body = json!({ "error": { "status": 403, "message": "Insufficient client scope" } })
        .to_string();
    let empty = HeaderMap::new();

    match classify_response(StatusCode::FORBIDDEN, &empty, &body) {
        Err(ApiError::Forbidden(message)) => assert_eq!(message, "Insufficient client scope"),
        other => panic!("unexpected {:?}", other),
    }

    let not_found = classify_response(StatusCode::NOT_FOUND, &empty, "gone");
    assert!(matches!(not_found, Err(ApiError::NotFound(ref m)) if m == "gone"));
    assert!(not_found.unwrap_err().is_inaccessible());

    assert!(matches!(
        classify_response(StatusCode::UNAUTHORIZED, &empty, ""),
        Err(ApiError::Unauthorized(_))
    ));

    let server = classify_response(StatusCode::INTERNAL_SERVER_ERROR, &empty, "oops");
    assert!(matches!(
        server,
        Err(ApiError::Status { status: 500, ref message }) if message == "oops"
    ));
    assert!(!server.unwrap_err().is_inaccessible());
}

#[test]
fn test_success_bodies() {
    let empty = HeaderMap::new();

    assert_eq!(
        classify_response(StatusCode::OK, &empty, r#"{"id": "u1"}"#).unwrap(),
        json!({ "id": "u1" })
    );
    assert_eq!(
        classify_response(StatusCode::CREATED, &empty, "  ").unwrap(),
        serde_json::Value::Null
    );
    assert!(matches!(
        classify_response(StatusCode::OK, &empty, "<html>"),
        Err(ApiError::Decode(_))
    ));
}

#[tokio::test]
async fn test_retry_after_header_drives_collector_backoff() {
    let dir = TempDir::new().unwrap();
    let rate_limited = classify_response(StatusCode::TOO_MANY_REQUESTS, &retry_after("2"), "");
    let api = FakeSpotify::new().on_get(
        "/me/top/artists",
        vec![rate_limited, Ok(page(vec![artist("a1", "Low")], None))],
    );
    let ctx = session(api, test_settings(dir.path()));

    let artists = collector::collect_top(&ctx, TopKind::Artists, ctx.settings.top_artists).await;

    assert_eq!(artists.len(), 1);
    assert_eq!(ctx.api.gets_to("/me/top/artists"), 2);
    // Retry-After plus the default one second margin
    assert_eq!(*ctx.sleeper.slept.borrow(), vec![Duration::from_secs(3)]);
}
