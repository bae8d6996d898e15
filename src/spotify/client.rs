use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{HeaderMap, RETRY_AFTER},
};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::management::TokenManager;

/// Failure of a single Spotify Web API request.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("rate limited (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}. Please run moodtape auth")]
    Unauthorized(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("still rate limited after {attempts} retries")]
    RetriesExhausted { attempts: u32 },
}

impl ApiError {
    /// Errors that mean "this one resource is not available to us".
    pub fn is_inaccessible(&self) -> bool {
        matches!(self, ApiError::Forbidden(_) | ApiError::NotFound(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// The slice of the Spotify Web API the pipeline talks to.
///
/// Everything above this trait builds URLs from [`SpotifyApi::base_url`] and
/// decodes JSON bodies itself, so a fake only has to script raw responses.
#[allow(async_fn_in_trait)]
pub trait SpotifyApi {
    fn base_url(&self) -> &str;

    async fn get_json(&self, url: &str) -> Result<Value, ApiError>;

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ApiError>;
}

/// reqwest-backed client authenticated with the cached OAuth token.
///
/// Every request asks the [`TokenManager`] for a valid access token first,
/// which refreshes it when it is close to expiry. Responses go through
/// [`classify_response`].
///
/// # Example
///
/// ```
/// let tokens = TokenManager::load(&settings.token_cache_path).await?;
/// let api = HttpSpotify::new(config::spotify_apiurl(), tokens);
/// let me = api.get_json(&format!("{}/me", api.base_url())).await?;
/// ```
pub struct HttpSpotify {
    client: Client,
    base_url: String,
    tokens: Mutex<TokenManager>,
}

impl HttpSpotify {
    pub fn new(base_url: String, tokens: TokenManager) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let token = self.tokens.lock().await.get_valid_token().await;
        let response = request.bearer_auth(token).send().await?;
        into_json(response).await
    }
}

impl SpotifyApi for HttpSpotify {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        self.send(self.client.get(url)).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ApiError> {
        self.send(self.client.post(url).json(body)).await
    }
}

async fn into_json(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.text().await?;
    classify_response(status, &headers, &body)
}

/// Maps a Spotify response onto [`ApiError`], or parses its JSON body.
///
/// # Arguments
///
/// * `status` - HTTP status of the response
/// * `headers` - Response headers; only `Retry-After` is read, and only on 429
/// * `body` - Raw response body
///
/// # Returns
///
/// - `Ok(Value)` - The parsed body, or `Value::Null` for an empty success body
/// - `Err(ApiError::RateLimited)` - 429, with the `Retry-After` seconds when
///   the header is present and numeric
/// - `Err(ApiError::Forbidden | NotFound | Unauthorized)` - 403, 404 and 401
/// - `Err(ApiError::Status)` - Any other non-success status
/// - `Err(ApiError::Decode)` - A success body that is not JSON
///
/// Error messages come from Spotify's `error.message` field when the body
/// has one.
pub fn classify_response(
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
) -> Result<Value, ApiError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        return Err(ApiError::RateLimited { retry_after });
    }

    if !status.is_success() {
        let message = error_message(body);
        return Err(match status {
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
            _ => ApiError::Status {
                status: status.as_u16(),
                message,
            },
        });
    }

    // Some write endpoints answer 201/200 with an empty body.
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// `Retry-After` in whole seconds; HTTP-date values are not used by Spotify.
pub fn parse_retry_after(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

/// Pulls `error.message` out of a Spotify error body, falling back to the
/// raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
